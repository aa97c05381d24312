//! UseCase 層
//!
//! UI 層から受け取ったコマンドとタイマー通知をルームに適用し、
//! 発生したイベントを配信するレイヤー。

pub mod coordinator;
pub mod error;
mod gameplay;
mod membership;

pub use coordinator::RoomCoordinator;
pub use error::CoordinatorError;
