use core::marker::PhantomData;

use critical_section::RestoreState;

/// 中断保护器，基于 RAII 实现中断保护。
/// 在创建时禁用可抢占当前上下文的中断源并保存之前的状态；
/// 在销毁时自动恢复之前的中断状态。
///
/// 底层由 `critical-section` 的平台实现提供，因此在 Cortex-M 上是
/// `cpsid i`，在 RISC-V 上是清除 `mstatus.MIE`，在主机测试中是全局互斥锁。
/// 可以嵌套，但必须以与创建相反的顺序销毁。
pub struct IntrGuard {
    state: RestoreState,
    // 恢复状态只能在获取它的上下文中释放
    _not_send: PhantomData<*mut ()>,
}

impl IntrGuard {
    /// 禁用中断并返回一个 IntrGuard 实例。
    /// 该实例在离开作用域时会自动恢复中断状态。
    #[inline]
    pub fn new() -> Self {
        let state = unsafe { critical_section::acquire() };
        IntrGuard {
            state,
            _not_send: PhantomData,
        }
    }
}

impl Default for IntrGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// 当 IntrGuard 离开作用域时，自动恢复中断状态。
impl Drop for IntrGuard {
    #[inline]
    fn drop(&mut self) {
        unsafe { critical_section::release(self.state) };
    }
}
