//! 惰性、单次遍历的流处理库。
//!
//! [`Stream`]包裹任意数据源，提供一系列中间操作（过滤、映射、窗口、近似排序、去重）和终结操作（聚合、选取、分组）。
//! 中间操作只构造新的流，终结操作按需从上游逐个拉取元素。
//!
//! ```
//! use rstream::{Order, Stream};
//!
//! let res = Stream::generate(0, |v| v + 1)
//!     .filter(|v| v % 3 == 0)
//!     .take(4)
//!     .sorted(Order::Desc)
//!     .to_vec();
//! assert_eq!(vec![9, 6, 3, 0], res);
//! ```
//!
//! 需要完整消费上游的操作（`take_last`、`sorted`、`groupby`、`find_last`等）不能用于无限流。
//! 流不是线程安全的，拉取会修改内部状态。

mod config;
mod err;
mod input;
mod op;
mod output;
mod pipe;
mod poll;

pub use config::{Order, SliceArg};
pub use err::{ErrKind, StreamErr};
pub use input::{IntoStream, KeyValue, RangeStep};
pub use ordered_float::OrderedFloat;
pub use output::{Groups, argmax, argmax_by_key, argmin, argmin_by_key};
pub use pipe::Stream;
pub use poll::{PollData, PollProducer, Polled, StopHandle};

/// 整数类型
pub type Integer = i64;

pub type StreamRes<T> = Result<T, StreamErr>;
