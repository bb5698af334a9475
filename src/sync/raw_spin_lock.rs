//! Interrupt-masking spin lock for state shared with interrupt handlers
//!
//! This module provides a spin lock that integrates with `lock_api::RawMutex`
//! so it can back a `lock_api::Mutex` and hand out ordinary RAII guards.
//!
//! # Interrupt Safety
//!
//! `lock()` enters a critical section before spinning on the flag, and the
//! saved interrupt state is restored by `unlock()`. On a single core this
//! means the flag is never contended: an interrupt handler cannot run while
//! a preempted context holds the lock, which is exactly what prevents the
//! handler from deadlocking against it.
//!
//! The lock is not re-entrant. Code that already holds a guard must pass the
//! guarded data down instead of locking again.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use super::intr_guard::IntrGuard;

/// 自旋锁结构体，不返回 Guard，集成了中断状态保存与恢复功能。
///
/// 持锁期间的 [`IntrGuard`] 保存在锁内部，由 `unlock` 销毁。
pub struct RawSpinLock {
    locked: AtomicBool,
    intr_guard: UnsafeCell<Option<IntrGuard>>,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
            intr_guard: UnsafeCell::new(None),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl lock_api::RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = lock_api::GuardNoSend;

    /// 获取锁，禁用中断并保存状态。
    fn lock(&self) {
        let guard = IntrGuard::new();

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        // Only the lock holder touches the stored guard
        unsafe { *self.intr_guard.get() = Some(guard) };
    }

    /// 尝试获取锁，成功则禁用中断并保存状态。
    ///
    /// 获取失败时 guard 在此处被销毁，中断状态立即恢复。
    fn try_lock(&self) -> bool {
        let guard = IntrGuard::new();

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            unsafe { *self.intr_guard.get() = Some(guard) };
            true
        } else {
            false
        }
    }

    /// 释放锁，恢复之前的中断状态。
    unsafe fn unlock(&self) {
        // Take the guard while we still own the lock
        let guard = unsafe { (*self.intr_guard.get()).take() };

        self.locked.store(false, Ordering::Release);

        drop(guard);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

// Safety: intr_guard is only accessed by the context holding `locked`
unsafe impl Send for RawSpinLock {}
unsafe impl Sync for RawSpinLock {}

/// A mutex whose guard keeps interrupts masked for as long as it lives.
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

/// RAII guard for [`SpinLock`].
pub type SpinLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;
