/// 排序方向
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Order {
    /// 正序：小的在前
    #[default]
    Asc,
    /// 逆序：大的在前
    Desc,
}

impl Order {
    #[inline]
    pub fn is_reversed(self) -> bool {
        self == Order::Desc
    }

    /// 按照方向调整比较结果
    #[inline]
    pub(crate) fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        if self.is_reversed() { ordering.reverse() } else { ordering }
    }
}

impl From<bool> for Order {
    /// `true`表示逆序
    fn from(reversed: bool) -> Self {
        if reversed { Order::Desc } else { Order::Asc }
    }
}

/// 切片参数，对应`islice`的`start`/`stop`/`step`。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SliceArg {
    /// 起始索引，包含
    pub start: usize,
    /// 结束索引，不包含，`None`表示直到流结束
    pub stop: Option<usize>,
    /// 步长，必须为正数
    pub step: usize,
}

impl SliceArg {
    pub fn new(start: usize, stop: Option<usize>, step: usize) -> SliceArg {
        SliceArg { start, stop, step }
    }

    /// 等价于`islice(stop)`
    pub fn stop(stop: usize) -> SliceArg {
        SliceArg { start: 0, stop: Some(stop), step: 1 }
    }

    /// 等价于`islice(start, stop)`
    pub fn range(start: usize, stop: Option<usize>) -> SliceArg {
        SliceArg { start, stop, step: 1 }
    }
}

impl From<std::ops::Range<usize>> for SliceArg {
    fn from(range: std::ops::Range<usize>) -> Self {
        SliceArg::range(range.start, Some(range.end))
    }
}

impl From<std::ops::RangeFrom<usize>> for SliceArg {
    fn from(range: std::ops::RangeFrom<usize>) -> Self {
        SliceArg::range(range.start, None)
    }
}
