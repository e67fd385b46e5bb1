use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrKind {
    /// 输入为空（或过滤后为空），且未提供默认值
    EmptyInput,
    /// 参数非法，例如步长为0、容量为0
    InvalidArg,
    /// 元素（或键）之间无法比较，例如浮点数`NaN`
    Incomparable,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum StreamErr {
    #[error("[Empty Input] `{op}` requires at least one element")]
    EmptyInput { op: &'static str },

    #[error("[Bad Arg] Invalid argument `{arg}` of `{op}`: {reason}")]
    InvalidArg { op: &'static str, arg: &'static str, reason: String },

    #[error("[Incomparable] `{op}` met values without a defined ordering")]
    Incomparable { op: &'static str },
}

impl StreamErr {
    pub(crate) fn invalid_arg(op: &'static str, arg: &'static str, reason: impl Into<String>) -> StreamErr {
        StreamErr::InvalidArg { op, arg, reason: reason.into() }
    }

    pub fn kind(&self) -> ErrKind {
        match self {
            StreamErr::EmptyInput { .. } => ErrKind::EmptyInput,
            StreamErr::InvalidArg { .. } => ErrKind::InvalidArg,
            StreamErr::Incomparable { .. } => ErrKind::Incomparable,
        }
    }

    /// 出错的操作名
    pub fn op(&self) -> &'static str {
        match self {
            StreamErr::EmptyInput { op } | StreamErr::InvalidArg { op, .. } | StreamErr::Incomparable { op } => op,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_op() {
        let err = StreamErr::EmptyInput { op: "max" };
        assert_eq!(ErrKind::EmptyInput, err.kind());
        assert_eq!("max", err.op());
        let err = StreamErr::invalid_arg("islice", "step", "must be positive");
        assert_eq!(ErrKind::InvalidArg, err.kind());
        assert_eq!("islice", err.op());
        assert_eq!(ErrKind::Incomparable, StreamErr::Incomparable { op: "sorted" }.kind());
    }

    #[test]
    fn test_display() {
        let err = StreamErr::EmptyInput { op: "find_last" };
        assert_eq!("[Empty Input] `find_last` requires at least one element", err.to_string());
        assert_eq!(
            "[Bad Arg] Invalid argument `qlen` of `quasi_sort`: must be positive",
            StreamErr::invalid_arg("quasi_sort", "qlen", "must be positive").to_string()
        );
    }
}
