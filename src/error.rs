use quick_xml::{
    Error as QuickXmlErrorMain, encoding::EncodingError,
    events::attributes::AttrError as QuickXmlAttrError,
};
use thiserror::Error;

/// 定义解析 EBU-TT-D 文档过程中可能发生的各种错误。
///
/// 解析是快速失败的：遇到第一个违规就中止整个解析，
/// 不会返回部分文档，也不会累积多个错误。
#[derive(Error, Debug)]
pub enum ParseError {
    /// XML 读取错误，通常来自 `quick-xml` 库。
    #[error("XML 解析错误: {0}")]
    Xml(#[from] QuickXmlErrorMain),
    /// XML 属性解析错误，通常来自 `quick-xml` 库。
    #[error("XML 属性错误: {0}")]
    Attribute(#[from] QuickXmlAttrError),
    /// XML 文本编码或解码错误。
    #[error("文本编码或解码错误: {0}")]
    Encoding(#[from] EncodingError),
    /// 文档的根元素不是 `<tt>`。
    #[error("无效的根元素: {0}")]
    InvalidRoot(String),
    /// 缺少必需的元素。
    #[error("缺少元素 `{0}`")]
    MissingElement(&'static str),
    /// 只允许出现一次的元素出现了多次。
    #[error("重复的元素 `{0}`")]
    DuplicateElement(&'static str),
    /// 元素缺少必需的属性。
    #[error("元素 `{element}` 缺少属性 `{attr}`")]
    MissingAttribute {
        /// 缺少属性的元素名。
        element: &'static str,
        /// 缺少的属性名。
        attr: &'static str,
    },
    /// 属性的字面值无法按其文法解析。
    #[error("属性 `{attr}` 的值无效: {value}")]
    InvalidAttribute {
        /// 属性名（带惯用前缀）。
        attr: String,
        /// 无法解析的原始字符串。
        value: String,
    },
    /// `xml:id` 在全文档范围内重复（不区分元素种类）。
    #[error("标识符重复: {0}")]
    DuplicateId(String),
    /// `xml:id` 属性存在但为空。
    #[error("元素 `{0}` 的 `xml:id` 属性为空")]
    EmptyId(&'static str),
    /// `style` 属性引用了样式表中不存在的标识符。
    #[error("未知的样式标识符: {0}")]
    UnknownStyle(String),
    /// `region` 属性引用了布局表中不存在的标识符。
    #[error("未知的区域标识符: {0}")]
    UnknownRegion(String),
    /// 段落和其所在的 `div` 同时指定了 `region` 属性。
    #[error("段落和所在的 `div` 同时指定了 `region` 属性")]
    ConflictingRegion,
    /// 无法解码的 XML 实体引用。
    #[error("未知的 XML 实体: &{0};")]
    UnknownEntity(String),
    /// 内部逻辑错误。
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 值解析器拒绝某个字面值时返回的轻量信号。
///
/// 只携带无法解析的原始字符串；调用方负责把它转换成带属性名的
/// [`ParseError::InvalidAttribute`]，保留诊断所需的出处信息。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无效的值: {0}")]
pub struct ValueError(pub String);

impl ValueError {
    pub(crate) fn new(value: &str) -> Self {
        Self(value.to_string())
    }
}
