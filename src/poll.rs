use crate::pipe::Stream;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

/// 一次轮询的结果
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Polled<R> {
    Record(R),
    /// 本次轮询超时，`elapsed_ms`为连续超时的累计时长
    Timeout { elapsed_ms: u64 },
    /// 生产者已结束，之后不会再被轮询
    Done,
}

/// 流中的元素：一条记录或一次超时
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PollData<R> {
    Record(R),
    Timeout { elapsed_ms: u64 },
}

impl<R> PollData<R> {
    pub fn record(self) -> Option<R> {
        match self {
            PollData::Record(record) => Some(record),
            PollData::Timeout { .. } => None,
        }
    }
}

/// 可以被要求停止的外部生产者，例如消息队列的轮询。
///
/// `stop`为`true`表示调用方要求停止，生产者应释放资源并返回[`Polled::Done`]。
pub trait PollProducer {
    type Record;

    fn poll(&mut self, stop: bool) -> Polled<Self::Record>;
}

/// 停止信号的发送端，可以在流之外（包括其他线程）使用。
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Sender<bool>,
}

impl StopHandle {
    /// 请求停止，下一次拉取时生效。流已结束时忽略。
    pub fn stop(&self) {
        let _ = self.sender.send(true);
    }
}

struct Controlled<P> {
    producer: P,
    signals: Receiver<bool>,
    done: bool,
}

impl<P: PollProducer> Iterator for Controlled<P> {
    type Item = PollData<P::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let stop = self.signals.try_iter().fold(false, |acc, signal| acc || signal);
        if stop {
            debug!("stop requested, forwarding to producer");
        }
        match self.producer.poll(stop) {
            Polled::Record(record) => Some(PollData::Record(record)),
            Polled::Timeout { elapsed_ms } => Some(PollData::Timeout { elapsed_ms }),
            Polled::Done => {
                self.done = true;
                None
            }
        }
    }
}

impl<'a, R: 'a> Stream<'a, PollData<R>> {
    /// 把可停止的生产者适配为流，返回流和停止信号的发送端。
    ///
    /// 停止信号不经过流本身：调用方通过[`StopHandle`]发送，流在下一次拉取时转交给生产者。
    pub fn controlled<P>(producer: P) -> (Stream<'a, PollData<R>>, StopHandle)
    where
        P: PollProducer<Record = R> + 'a,
    {
        let (sender, signals) = mpsc::channel();
        (Stream::wrap(Controlled { producer, signals, done: false }), StopHandle { sender })
    }

    /// 丢弃超时，只保留记录。
    pub fn records(self) -> Stream<'a, R> {
        Stream::wrap(self.iter.filter_map(PollData::record))
    }
}
