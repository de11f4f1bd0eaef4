//! # EBU-TT-D 解析器 - 常量定义
//!
//! 该模块包含了在解析 EBU-TT-D 文档时用到的所有 XML 标签和属性的常量定义。
//! 标签按本地名匹配；属性按其惯用的限定名匹配。

pub(super) const TAG_TT: &[u8] = b"tt";
pub(super) const TAG_HEAD: &[u8] = b"head";
pub(super) const TAG_STYLING: &[u8] = b"styling";
pub(super) const TAG_LAYOUT: &[u8] = b"layout";
pub(super) const TAG_STYLE: &[u8] = b"style";
pub(super) const TAG_REGION: &[u8] = b"region";
pub(super) const TAG_BODY: &[u8] = b"body";
pub(super) const TAG_DIV: &[u8] = b"div";
pub(super) const TAG_P: &[u8] = b"p";
pub(super) const TAG_SPAN: &[u8] = b"span";
pub(super) const TAG_BR: &[u8] = b"br";

pub(super) const ATTR_XML_ID: &[u8] = b"xml:id";
pub(super) const ATTR_XML_LANG: &[u8] = b"xml:lang";
pub(super) const ATTR_XML_SPACE: &[u8] = b"xml:space";

pub(super) const ATTR_TIME_BASE: &[u8] = b"ttp:timeBase";
pub(super) const ATTR_CELL_RESOLUTION: &[u8] = b"ttp:cellResolution";
pub(super) const ATTR_ACTIVE_AREA: &[u8] = b"ittp:activeArea";

pub(super) const ATTR_STYLE: &[u8] = b"style";
pub(super) const ATTR_REGION: &[u8] = b"region";
pub(super) const ATTR_BEGIN: &[u8] = b"begin";
pub(super) const ATTR_END: &[u8] = b"end";

pub(super) const ATTR_BACKGROUND_COLOR: &[u8] = b"tts:backgroundColor";
pub(super) const ATTR_COLOR: &[u8] = b"tts:color";
pub(super) const ATTR_DIRECTION: &[u8] = b"tts:direction";
pub(super) const ATTR_FILL_LINE_GAP: &[u8] = b"itts:fillLineGap";
pub(super) const ATTR_FONT_FAMILY: &[u8] = b"tts:fontFamily";
pub(super) const ATTR_FONT_SIZE: &[u8] = b"tts:fontSize";
pub(super) const ATTR_FONT_STYLE: &[u8] = b"tts:fontStyle";
pub(super) const ATTR_FONT_WEIGHT: &[u8] = b"tts:fontWeight";
pub(super) const ATTR_LINE_HEIGHT: &[u8] = b"tts:lineHeight";
pub(super) const ATTR_LINE_PADDING: &[u8] = b"ebutts:linePadding";
pub(super) const ATTR_MULTI_ROW_ALIGN: &[u8] = b"ebutts:multiRowAlign";
pub(super) const ATTR_TEXT_ALIGN: &[u8] = b"tts:textAlign";
pub(super) const ATTR_TEXT_DECORATION: &[u8] = b"tts:textDecoration";
pub(super) const ATTR_TEXT_OUTLINE: &[u8] = b"tts:textOutline";
pub(super) const ATTR_UNICODE_BIDI: &[u8] = b"tts:unicodeBidi";
pub(super) const ATTR_WRAP_OPTION: &[u8] = b"tts:wrapOption";

pub(super) const ATTR_ORIGIN: &[u8] = b"tts:origin";
pub(super) const ATTR_EXTENT: &[u8] = b"tts:extent";
pub(super) const ATTR_DISPLAY_ALIGN: &[u8] = b"tts:displayAlign";
pub(super) const ATTR_OVERFLOW: &[u8] = b"tts:overflow";
pub(super) const ATTR_PADDING: &[u8] = b"tts:padding";
pub(super) const ATTR_SHOW_BACKGROUND: &[u8] = b"tts:showBackground";
pub(super) const ATTR_WRITING_MODE: &[u8] = b"tts:writingMode";
