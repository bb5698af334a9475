//! 同步原语
//!
//! 向日志管线提供临界区与自旋锁。
//! 环形缓冲区游标和发送状态机都只在这些原语的保护下修改。
mod intr_guard;
mod raw_spin_lock;

pub use intr_guard::*;
pub use raw_spin_lock::*;
