//! # EBU-TT-D 文档模型
//!
//! 该模块定义了解析结果的完整类型树（[`Document`] 及其子实体）、
//! 各个属性值文法的解析器，以及样式级联所用的
//! [`StyleProperties`] / [`ResolvedStyle`] 两种样式记录。
//!
//! 所有值解析器都是纯函数：接收去除首尾空白后的字符串，
//! 返回类型化的值，或者以 [`ValueError`] 拒绝并携带原始字面值。

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// 按空白切分属性值，丢弃空片段。
fn split_value(value: &str) -> Vec<&str> {
    value.split_whitespace().collect()
}

/// 长度值的单位：单元格（`c` 后缀）或百分比（`%` 后缀）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// 单元格单位，保留原始数值。
    Cell,
    /// 百分比单位，归一化为 [0, 1] 区间的小数。
    Percent,
}

impl Unit {
    /// 解析带后缀的长度值。
    ///
    /// 数值部分必须有限且非负；`max_value` 限制原始数值的上限
    /// （例如坐标类的值不得超过 100%）。
    ///
    /// # Errors
    ///
    /// 后缀缺失、数值非法、越界时返回 [`ValueError`]。
    pub fn parse(self, value: &str, max_value: Option<f64>) -> Result<f64, ValueError> {
        let v = value.trim();
        let suffix = match self {
            Self::Cell => 'c',
            Self::Percent => '%',
        };
        let number = v.strip_suffix(suffix).ok_or_else(|| ValueError::new(value))?;
        let n: f64 = number.parse().map_err(|_| ValueError::new(value))?;
        if !n.is_finite() || n < 0.0 {
            return Err(ValueError::new(value));
        }
        if let Some(max) = max_value
            && n > max
        {
            return Err(ValueError::new(value));
        }
        match self {
            Self::Cell => Ok(n),
            Self::Percent => Ok(n / 100.0),
        }
    }
}

/// 画布上的有效显示区域，四个分量都是归一化后的小数。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveArea {
    /// 左边缘相对画布的偏移。
    pub left: f64,
    /// 上边缘相对画布的偏移。
    pub top: f64,
    /// 区域宽度。
    pub width: f64,
    /// 区域高度。
    pub height: f64,
}

impl Default for ActiveArea {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl ActiveArea {
    /// 解析 `ittp:activeArea` 的值：恰好四个百分比。
    ///
    /// # Errors
    ///
    /// 分量个数不为四或任一分量非法时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let values = split_value(value);
        if values.len() != 4 {
            return Err(ValueError::new(value));
        }
        Ok(Self {
            left: Unit::Percent.parse(values[0], Some(100.0))?,
            top: Unit::Percent.parse(values[1], Some(100.0))?,
            width: Unit::Percent.parse(values[2], Some(100.0))?,
            height: Unit::Percent.parse(values[3], Some(100.0))?,
        })
    }
}

/// 文档的单元格网格分辨率（列 × 行）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellResolution {
    /// 列数，必须大于零。
    pub columns: u32,
    /// 行数，必须大于零。
    pub rows: u32,
}

impl Default for CellResolution {
    fn default() -> Self {
        Self {
            columns: 32,
            rows: 15,
        }
    }
}

impl CellResolution {
    /// 解析 `ttp:cellResolution` 的值：恰好两个正整数。
    ///
    /// # Errors
    ///
    /// 个数不为二、非整数或存在零值时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let values = split_value(value);
        if values.len() != 2 {
            return Err(ValueError::new(value));
        }
        let columns: u32 = values[0].parse().map_err(|_| ValueError::new(value))?;
        let rows: u32 = values[1].parse().map_err(|_| ValueError::new(value))?;
        if columns == 0 || rows == 0 {
            return Err(ValueError::new(value));
        }
        Ok(Self { columns, rows })
    }
}

/// RGBA 颜色，每个通道 0–255。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// 红色通道。
    pub red: u8,
    /// 绿色通道。
    pub green: u8,
    /// 蓝色通道。
    pub blue: u8,
    /// 透明度通道，0 为完全透明。
    pub alpha: u8,
}

impl Color {
    /// 不透明的黑色。
    #[must_use]
    pub const fn black() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 255,
        }
    }

    /// 不透明的白色。
    #[must_use]
    pub const fn white() -> Self {
        Self {
            red: 255,
            green: 255,
            blue: 255,
            alpha: 255,
        }
    }

    /// 完全透明。
    #[must_use]
    pub const fn transparent() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 0,
        }
    }

    /// 解析 `#RRGGBB` 或 `#RRGGBBAA` 形式的十六进制颜色。
    ///
    /// 六位形式的 alpha 固定为 0（完全透明），而不是补全为不透明；
    /// 与之相对，[`Color::black`] / [`Color::white`] 是完全不透明的。
    ///
    /// # Errors
    ///
    /// 缺少 `#` 前缀、长度不为 6/8 或含非十六进制字符时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let v = value.trim();
        let hex = v.strip_prefix('#').ok_or_else(|| ValueError::new(value))?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(ValueError::new(value));
        }
        let channel =
            |range| u8::from_str_radix(&hex[range], 16).map_err(|_| ValueError::new(value));
        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
            alpha: if hex.len() == 8 { channel(6..8)? } else { 0 },
        })
    }
}

/// 文本书写方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// 从左到右。
    #[default]
    Ltr,
    /// 从右到左。
    Rtl,
}

impl Direction {
    /// 解析 `tts:direction` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 区域内内容在块方向上的对齐方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayAlign {
    /// 靠块起始边。
    #[default]
    Before,
    /// 居中。
    Center,
    /// 靠块结束边。
    After,
}

impl DisplayAlign {
    /// 解析 `tts:displayAlign` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "before" => Ok(Self::Before),
            "center" => Ok(Self::Center),
            "after" => Ok(Self::After),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 区域原点，两个分量都是有效区域的百分比小数。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Origin {
    /// 水平偏移。
    pub x: f64,
    /// 垂直偏移。
    pub y: f64,
}

impl Origin {
    /// 解析 `tts:origin` 的值：恰好两个百分比。
    ///
    /// # Errors
    ///
    /// 分量个数不为二或任一分量非法时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let values = split_value(value);
        if values.len() != 2 {
            return Err(ValueError::new(value));
        }
        Ok(Self {
            x: Unit::Percent.parse(values[0], Some(100.0))?,
            y: Unit::Percent.parse(values[1], Some(100.0))?,
        })
    }
}

/// 区域尺寸，两个分量都是有效区域的百分比小数。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    /// 宽度。
    pub width: f64,
    /// 高度。
    pub height: f64,
}

impl Extent {
    /// 解析 `tts:extent` 的值：恰好两个百分比。
    ///
    /// # Errors
    ///
    /// 分量个数不为二或任一分量非法时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let values = split_value(value);
        if values.len() != 2 {
            return Err(ValueError::new(value));
        }
        Ok(Self {
            width: Unit::Percent.parse(values[0], Some(100.0))?,
            height: Unit::Percent.parse(values[1], Some(100.0))?,
        })
    }
}

/// 字体样式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    /// 常规。
    #[default]
    Normal,
    /// 斜体。
    Italic,
}

impl FontStyle {
    /// 解析 `tts:fontStyle` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "normal" => Ok(Self::Normal),
            "italic" => Ok(Self::Italic),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 字重。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    /// 常规。
    #[default]
    Normal,
    /// 加粗。
    Bold,
}

impl FontWeight {
    /// 解析 `tts:fontWeight` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 解析 `tts:lineHeight` 的值。
///
/// `normal` 表示没有显式行高，返回 `None`；其余按百分比解析。
///
/// # Errors
///
/// 百分比非法时返回 [`ValueError`]。
pub fn parse_line_height(value: &str) -> Result<Option<f64>, ValueError> {
    if value.trim() == "normal" {
        return Ok(None);
    }
    Unit::Percent.parse(value, None).map(Some)
}

/// 多行文本中各行相对段落对齐方式的对齐。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MultiRowAlign {
    /// 跟随 `textAlign`。
    #[default]
    Auto,
    /// 各行靠起始边。
    Start,
    /// 各行居中。
    Center,
    /// 各行靠结束边。
    End,
}

impl MultiRowAlign {
    /// 解析 `ebutts:multiRowAlign` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "auto" => Ok(Self::Auto),
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 区域内容溢出时的处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overflow {
    /// 裁剪溢出内容。
    #[default]
    Hidden,
    /// 允许溢出可见。
    Visible,
}

impl Overflow {
    /// 解析 `tts:overflow` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "hidden" => Ok(Self::Hidden),
            "visible" => Ok(Self::Visible),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 区域内边距，四个分量都是百分比小数。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    /// 块起始边内边距。
    pub before: f64,
    /// 行结束边内边距。
    pub end: f64,
    /// 块结束边内边距。
    pub after: f64,
    /// 行起始边内边距。
    pub start: f64,
}

impl Padding {
    /// 解析 `tts:padding` 的值：1–4 个百分比，按 CSS 简写规则展开。
    ///
    /// 1 个值填满四边；2 个值分别设置 before/after 与 end/start；
    /// 3 个值依次设置 before、end/start、after；4 个值独立设置四边。
    ///
    /// # Errors
    ///
    /// 个数为零或超过四、任一分量非法时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let values = split_value(value);
        if values.is_empty() || values.len() > 4 {
            return Err(ValueError::new(value));
        }
        let mut padding = Self::default();
        for (i, v) in values.iter().enumerate() {
            let length = Unit::Percent.parse(v, None)?;
            match i {
                0 => {
                    padding.before = length;
                    padding.end = length;
                    padding.after = length;
                    padding.start = length;
                }
                1 => {
                    padding.end = length;
                    padding.start = length;
                }
                2 => padding.after = length,
                _ => padding.start = length,
            }
        }
        Ok(padding)
    }
}

/// 区域背景的显示时机。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShowBackground {
    /// 始终显示。
    #[default]
    Always,
    /// 仅在区域内有活动内容时显示。
    WhenActive,
}

impl ShowBackground {
    /// 解析 `tts:showBackground` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "always" => Ok(Self::Always),
            "whenActive" => Ok(Self::WhenActive),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 行内文本对齐方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    /// 靠左。
    Left,
    /// 居中。
    Center,
    /// 靠右。
    Right,
    /// 靠书写方向起始边。
    #[default]
    Start,
    /// 靠书写方向结束边。
    End,
}

impl TextAlign {
    /// 解析 `tts:textAlign` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 文本装饰。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDecoration {
    /// 无装饰。
    #[default]
    None,
    /// 下划线。
    Underline,
}

impl TextDecoration {
    /// 解析 `tts:textDecoration` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "none" => Ok(Self::None),
            "underline" => Ok(Self::Underline),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 文本描边参数。
///
/// 粗细与模糊半径在样式声明中是字号的百分比，级联解析后
/// 会被换算成画布的绝对比例。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextOutline {
    /// 描边颜色；缺省时由渲染器决定。
    pub color: Option<Color>,
    /// 描边粗细。
    pub thickness: f64,
    /// 模糊半径。
    pub blur_radius: Option<f64>,
}

impl TextOutline {
    /// 解析 `tts:textOutline` 的值。
    ///
    /// `none` 表示没有描边；否则是可选的颜色、必需的粗细、
    /// 可选的模糊半径三个 token。只有颜色没有粗细是错误。
    ///
    /// # Errors
    ///
    /// token 个数超过三、缺少粗细或任一 token 非法时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Option<Self>, ValueError> {
        let values = split_value(value);
        if values.is_empty() {
            return Err(ValueError::new(value));
        }
        if values.len() == 1 && values[0] == "none" {
            return Ok(None);
        }
        if values.len() > 3 {
            return Err(ValueError::new(value));
        }
        let mut rest = values.as_slice();
        let mut color = None;
        if rest[0].starts_with('#') {
            if rest.len() == 1 {
                return Err(ValueError::new(value));
            }
            color = Some(Color::parse(rest[0])?);
            rest = &rest[1..];
        }
        let thickness = Unit::Percent.parse(rest[0], None)?;
        let blur_radius = if rest.len() > 1 {
            Some(Unit::Percent.parse(rest[1], None)?)
        } else {
            None
        };
        Ok(Some(Self {
            color,
            thickness,
            blur_radius,
        }))
    }
}

/// 空白字符的处理模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Space {
    /// 折叠连续空白。
    #[default]
    Default,
    /// 逐字保留空白。
    Preserve,
}

impl Space {
    /// 解析 `xml:space` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "default" => Ok(Self::Default),
            "preserve" => Ok(Self::Preserve),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 双向文本的嵌入模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnicodeBidi {
    /// 常规。
    #[default]
    Normal,
    /// 嵌入新的方向层级。
    Embed,
    /// 强制覆盖方向。
    BidiOverride,
}

impl UnicodeBidi {
    /// 解析 `tts:unicodeBidi` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "normal" => Ok(Self::Normal),
            "embed" => Ok(Self::Embed),
            "bidiOverride" => Ok(Self::BidiOverride),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 自动换行选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapOption {
    /// 允许换行。
    #[default]
    Wrap,
    /// 禁止换行。
    NoWrap,
}

impl WrapOption {
    /// 解析 `tts:wrapOption` 的值。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "wrap" => Ok(Self::Wrap),
            "noWrap" => Ok(Self::NoWrap),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 书写模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WritingMode {
    /// 从左到右、从上到下。
    #[default]
    Lrtb,
    /// 从右到左、从上到下。
    Rltb,
    /// 从上到下、从右到左。
    Tbrl,
    /// 从上到下、从左到右。
    Tblr,
}

impl WritingMode {
    /// 解析 `tts:writingMode` 的值。
    ///
    /// 接受两字母缩写 `lr`、`rl`、`tb` 作为对应四字母值的同义词；
    /// 这是所有枚举中唯一允许同义词的地方。
    ///
    /// # Errors
    ///
    /// 不在封闭词汇表内时返回 [`ValueError`]。
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.trim() {
            "lrtb" | "lr" => Ok(Self::Lrtb),
            "rltb" | "rl" => Ok(Self::Rltb),
            "tbrl" | "tb" => Ok(Self::Tbrl),
            "tblr" => Ok(Self::Tblr),
            _ => Err(ValueError::new(value)),
        }
    }
}

/// 默认字体族回退列表。
fn default_font_family() -> Vec<String> {
    vec!["default".to_string()]
}

/// 解析后的完整字幕文档。
///
/// 所有样式属性都已经过级联解析：继承已应用、相对单位已换算成
/// 绝对值。区域通过在 [`Document::regions`] 中的下标被引用，
/// 字符串句柄不会出现在解析结果里。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// 画布上的有效显示区域。
    pub active_area: ActiveArea,
    /// 单元格网格分辨率。
    pub cell_resolution: CellResolution,
    /// 文档语言标签。
    pub language: String,
    /// 文档级空白处理模式。
    pub space: Space,
    /// 布局区域，按声明顺序排列。
    pub regions: Vec<Region>,
    /// 文档正文。
    pub body: Body,
}

/// 布局区域：固定矩形，只承载布局属性，不含文本。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    /// 区域原点。
    pub origin: Origin,
    /// 区域尺寸。
    pub extent: Extent,
    /// 块方向对齐。
    pub display_align: DisplayAlign,
    /// 溢出策略。
    pub overflow: Overflow,
    /// 内边距。
    pub padding: Padding,
    /// 背景显示时机。
    pub show_background: ShowBackground,
    /// 书写模式。
    pub writing_mode: WritingMode,
}

/// 文档正文：一个或多个 [`Div`] 的有序序列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// 解析后的背景颜色。
    pub background_color: Color,
    /// 正文包含的分区。
    pub divs: Vec<Div>,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            background_color: Color::transparent(),
            divs: Vec::new(),
        }
    }
}

/// 正文分区：一个或多个 [`Paragraph`] 的有序序列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Div {
    /// `xml:id`，缺省时为空字符串。
    pub id: String,
    /// 语言标签，缺省时为空字符串。
    pub language: String,
    /// 解析后的背景颜色。
    pub background_color: Color,
    /// 分区包含的段落。
    pub paragraphs: Vec<Paragraph>,
}

/// 段落内的行内内容：强制换行或文本跨度。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InlineContent {
    /// 强制换行，无负载。
    Br,
    /// 文本跨度。
    Span(Span),
}

/// 字幕段落，带有起止时间与解析后的段落级样式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// `xml:id`。
    pub id: String,
    /// 开始时间，单位为秒。
    pub begin_secs: f64,
    /// 结束时间，单位为秒。本层不校验其与开始时间的先后。
    pub end_secs: f64,
    /// 段落所属区域在 [`Document::regions`] 中的下标。
    pub region_index: usize,
    /// 语言标签。
    pub language: String,
    /// 空白处理模式。
    pub space: Space,
    /// 解析后的背景颜色。
    pub background_color: Color,
    /// 文本方向。
    pub direction: Direction,
    /// 是否填充行间空隙。
    pub fill_line_gap: bool,
    /// 解析后的绝对行高；`None` 表示 `normal`。
    pub line_height: Option<f64>,
    /// 解析后的行内边距（画布比例）。
    pub line_padding: f64,
    /// 多行对齐。
    pub multi_row_align: MultiRowAlign,
    /// 文本对齐。
    pub text_align: TextAlign,
    /// 双向文本模式。
    pub unicode_bidi: UnicodeBidi,
    /// 行内内容序列。
    pub contents: Vec<InlineContent>,
}

/// 文本跨度，承载文字与解析后的字符级样式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// `xml:id`，缺省时为空字符串。
    pub id: String,
    /// 语言标签。
    pub language: String,
    /// 空白处理模式。
    pub space: Space,
    /// 解析后的背景颜色。
    pub background_color: Color,
    /// 解析后的前景颜色。
    pub color: Color,
    /// 文本方向。
    pub direction: Direction,
    /// 字体族回退列表。
    pub font_family: Vec<String>,
    /// 解析后的绝对字号（画布高度比例）。
    pub font_size: f64,
    /// 字体样式。
    pub font_style: FontStyle,
    /// 字重。
    pub font_weight: FontWeight,
    /// 文本装饰。
    pub text_decoration: TextDecoration,
    /// 解析后的文本描边。
    pub text_outline: Option<TextOutline>,
    /// 双向文本模式。
    pub unicode_bidi: UnicodeBidi,
    /// 换行选项。
    pub wrap_option: WrapOption,
    /// 文字内容，原样保留。
    pub text: String,
}

/// 单条 `<style>` 声明的原始（未解析的）属性集合。
///
/// 每个字段独立地存在或缺失；级联合并时存在的字段总是覆盖累加器。
/// `line_height` 与 `text_outline` 的内层 `Option` 表示声明的
/// `normal` / `none`，即"显式地清除继承值"。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleProperties {
    /// `tts:backgroundColor`。
    pub background_color: Option<Color>,
    /// `tts:color`。
    pub color: Option<Color>,
    /// `tts:direction`。
    pub direction: Option<Direction>,
    /// `itts:fillLineGap`。
    pub fill_line_gap: Option<bool>,
    /// `tts:fontFamily`。
    pub font_family: Option<Vec<String>>,
    /// `tts:fontSize`，字号相对父级的百分比小数。
    pub font_size: Option<f64>,
    /// `tts:fontStyle`。
    pub font_style: Option<FontStyle>,
    /// `tts:fontWeight`。
    pub font_weight: Option<FontWeight>,
    /// `tts:lineHeight`，相对字号的百分比小数。
    pub line_height: Option<Option<f64>>,
    /// `ebutts:linePadding`，单元格单位。
    pub line_padding: Option<f64>,
    /// `ebutts:multiRowAlign`。
    pub multi_row_align: Option<MultiRowAlign>,
    /// `tts:textAlign`。
    pub text_align: Option<TextAlign>,
    /// `tts:textDecoration`。
    pub text_decoration: Option<TextDecoration>,
    /// `tts:textOutline`，相对字号的百分比小数。
    pub text_outline: Option<Option<TextOutline>>,
    /// `tts:unicodeBidi`。
    pub unicode_bidi: Option<UnicodeBidi>,
    /// `tts:wrapOption`。
    pub wrap_option: Option<WrapOption>,
}

bitflags! {
    /// 标记一次合并触碰到了哪些相对单位属性，
    /// 决定单位换算步骤需要重新计算的字段。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ComputeMask: u8 {
        /// 字号被触碰。
        const FONT_SIZE = 1;
        /// 行高被触碰。
        const LINE_HEIGHT = 1 << 1;
        /// 行内边距被触碰。
        const LINE_PADDING = 1 << 2;
        /// 文本描边被触碰。
        const TEXT_OUTLINE = 1 << 3;
    }
}

/// 级联解析的累加器：同一组属性，但每个字段都有确定的值。
///
/// 每个作用域实例都会新建一份，字段被复制进对应实体后即丢弃。
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// 背景颜色。不继承：每个新作用域重置为透明。
    pub background_color: Color,
    /// 前景颜色。
    pub color: Color,
    /// 文本方向。
    pub direction: Direction,
    /// 是否填充行间空隙。
    pub fill_line_gap: bool,
    /// 字体族回退列表。
    pub font_family: Vec<String>,
    /// 字号。合并后是相对父级的小数，单位换算后是画布的绝对比例。
    pub font_size: f64,
    /// 字体样式。
    pub font_style: FontStyle,
    /// 字重。
    pub font_weight: FontWeight,
    /// 行高；`None` 表示 `normal`。
    pub line_height: Option<f64>,
    /// 行内边距。
    pub line_padding: f64,
    /// 多行对齐。
    pub multi_row_align: MultiRowAlign,
    /// 文本对齐。
    pub text_align: TextAlign,
    /// 文本装饰。
    pub text_decoration: TextDecoration,
    /// 文本描边。
    pub text_outline: Option<TextOutline>,
    /// 双向文本模式。不继承：每个新作用域重置为 normal。
    pub unicode_bidi: UnicodeBidi,
    /// 换行选项。
    pub wrap_option: WrapOption,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            background_color: Color::transparent(),
            color: Color::white(),
            direction: Direction::Ltr,
            fill_line_gap: false,
            font_family: default_font_family(),
            font_size: 1.0,
            font_style: FontStyle::Normal,
            font_weight: FontWeight::Normal,
            line_height: None,
            line_padding: 0.0,
            multi_row_align: MultiRowAlign::Auto,
            text_align: TextAlign::Start,
            text_decoration: TextDecoration::None,
            text_outline: None,
            unicode_bidi: UnicodeBidi::Normal,
            wrap_option: WrapOption::Wrap,
        }
    }
}

impl ResolvedStyle {
    /// 把一条样式声明逐字段合并进累加器：存在的字段总是覆盖。
    ///
    /// 返回本次合并触碰到的相对单位属性集合，供单位换算步骤使用。
    pub(crate) fn merge(&mut self, properties: &StyleProperties) -> ComputeMask {
        let mut mask = ComputeMask::empty();
        if let Some(v) = properties.background_color {
            self.background_color = v;
        }
        if let Some(v) = properties.color {
            self.color = v;
        }
        if let Some(v) = properties.direction {
            self.direction = v;
        }
        if let Some(v) = properties.fill_line_gap {
            self.fill_line_gap = v;
        }
        if let Some(v) = &properties.font_family {
            self.font_family = v.clone();
        }
        if let Some(v) = properties.font_style {
            self.font_style = v;
        }
        if let Some(v) = properties.font_weight {
            self.font_weight = v;
        }
        if let Some(v) = properties.multi_row_align {
            self.multi_row_align = v;
        }
        if let Some(v) = properties.text_align {
            self.text_align = v;
        }
        if let Some(v) = properties.text_decoration {
            self.text_decoration = v;
        }
        if let Some(v) = properties.unicode_bidi {
            self.unicode_bidi = v;
        }
        if let Some(v) = properties.wrap_option {
            self.wrap_option = v;
        }
        if let Some(v) = properties.line_height {
            self.line_height = v;
            mask |= ComputeMask::LINE_HEIGHT;
        }
        if let Some(v) = properties.text_outline {
            self.text_outline = v;
            mask |= ComputeMask::TEXT_OUTLINE;
        }
        if let Some(v) = properties.font_size {
            self.font_size = v;
            mask |= ComputeMask::FONT_SIZE;
        }
        if let Some(v) = properties.line_padding {
            self.line_padding = v;
            mask |= ComputeMask::LINE_PADDING;
        }
        mask
    }

    /// 单位换算步骤：把本作用域触碰到的相对单位换算成绝对值。
    ///
    /// `parent_font_size` 是上一个作用域解析完成的绝对字号；
    /// 只有种子作用域没有父基准，此时字号以单元格行高为基准。
    /// 字号被触碰时，行高与描边即使未被重新声明也要重新推导，
    /// 因为它们以字号为基准。行内边距的基准始终是网格列数。
    pub(crate) fn compute(
        &mut self,
        mask: ComputeMask,
        parent_font_size: Option<f64>,
        cell_resolution: CellResolution,
    ) {
        let compute_font_size = mask.contains(ComputeMask::FONT_SIZE);
        if compute_font_size {
            self.font_size = match parent_font_size {
                None => self.font_size / f64::from(cell_resolution.rows),
                Some(parent) => self.font_size * parent,
            };
        }
        if (compute_font_size || mask.contains(ComputeMask::LINE_HEIGHT))
            && let Some(line_height) = self.line_height
        {
            self.line_height = Some(line_height * self.font_size);
        }
        if mask.contains(ComputeMask::LINE_PADDING) {
            self.line_padding /= f64::from(cell_resolution.columns);
        }
        if (compute_font_size || mask.contains(ComputeMask::TEXT_OUTLINE))
            && let Some(outline) = &mut self.text_outline
        {
            outline.thickness *= self.font_size;
            if let Some(blur_radius) = outline.blur_radius {
                outline.blur_radius = Some(blur_radius * self.font_size);
            }
        }
    }

    /// 在进入新作用域时重置不继承的属性。
    ///
    /// 背景颜色与双向文本模式只作用于声明它们的元素，
    /// 不得从祖先作用域泄漏到未重新声明的后代作用域。
    pub(crate) fn reset_non_inherited(&mut self) {
        self.background_color = Color::transparent();
        self.unicode_bidi = UnicodeBidi::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_unit() {
        assert!((Unit::Percent.parse("50%", None).unwrap() - 0.5).abs() < 1e-12);
        assert!((Unit::Percent.parse("0%", None).unwrap()).abs() < 1e-12);
        assert!((Unit::Percent.parse("100%", Some(100.0)).unwrap() - 1.0).abs() < 1e-12);
        assert!((Unit::Percent.parse("  37.5% ", None).unwrap() - 0.375).abs() < 1e-12);
        // 超过调用方给定的上限
        assert!(Unit::Percent.parse("100.5%", Some(100.0)).is_err());
        // 缺少后缀、负数、非有限数
        assert!(Unit::Percent.parse("50", None).is_err());
        assert!(Unit::Percent.parse("50c", None).is_err());
        assert!(Unit::Percent.parse("-1%", None).is_err());
        assert!(Unit::Percent.parse("inf%", None).is_err());
        assert!(Unit::Percent.parse("NaN%", None).is_err());
        assert!(Unit::Percent.parse("%", None).is_err());
        assert!(Unit::Percent.parse("", None).is_err());
    }

    #[test]
    fn test_cell_unit() {
        // 单元格单位保留原始数值
        assert!((Unit::Cell.parse("2c", None).unwrap() - 2.0).abs() < 1e-12);
        assert!((Unit::Cell.parse("0.5c", None).unwrap() - 0.5).abs() < 1e-12);
        assert!(Unit::Cell.parse("2%", None).is_err());
        assert!(Unit::Cell.parse("-2c", None).is_err());
    }

    #[test]
    fn test_color_parse() {
        let c = Color::parse("#FF8000").unwrap();
        assert_eq!((c.red, c.green, c.blue), (255, 128, 0));
        // 六位形式的 alpha 是 0（完全透明），不是不透明
        assert_eq!(c.alpha, 0);

        let c = Color::parse("#FF8000C0").unwrap();
        assert_eq!(c.alpha, 0xC0);

        assert_eq!(Color::black().alpha, 255);
        assert_eq!(Color::white().alpha, 255);
        assert_eq!(Color::transparent().alpha, 0);

        assert!(Color::parse("FF8000").is_err());
        assert!(Color::parse("#FF80").is_err());
        assert!(Color::parse("#FF8000C").is_err());
        assert!(Color::parse("#GG8000").is_err());
        assert!(Color::parse("#FF8000C0FF").is_err());
    }

    #[test]
    fn test_cell_resolution_parse() {
        let r = CellResolution::parse("40 24").unwrap();
        assert_eq!((r.columns, r.rows), (40, 24));
        assert_eq!(CellResolution::default(), CellResolution { columns: 32, rows: 15 });
        assert!(CellResolution::parse("40").is_err());
        assert!(CellResolution::parse("40 24 1").is_err());
        assert!(CellResolution::parse("0 24").is_err());
        assert!(CellResolution::parse("40 0").is_err());
        assert!(CellResolution::parse("40 -24").is_err());
        assert!(CellResolution::parse("40 x").is_err());
    }

    #[test]
    fn test_geometry_arity() {
        assert!(Origin::parse("10% 20%").is_ok());
        assert!(Origin::parse("10%").is_err());
        assert!(Origin::parse("10% 20% 30%").is_err());
        assert!(Extent::parse("50% 20%").is_ok());
        assert!(Extent::parse("101% 20%").is_err());
        let area = ActiveArea::parse("10% 10% 80% 80%").unwrap();
        assert!((area.left - 0.1).abs() < 1e-12);
        assert!((area.height - 0.8).abs() < 1e-12);
        assert!(ActiveArea::parse("10% 10% 80%").is_err());
    }

    #[test]
    fn test_padding_shorthand() {
        let p = Padding::parse("1%").unwrap();
        assert!((p.before - 0.01).abs() < 1e-12);
        assert!((p.end - 0.01).abs() < 1e-12);
        assert!((p.after - 0.01).abs() < 1e-12);
        assert!((p.start - 0.01).abs() < 1e-12);

        let p = Padding::parse("1% 2%").unwrap();
        assert!((p.before - 0.01).abs() < 1e-12);
        assert!((p.after - 0.01).abs() < 1e-12);
        assert!((p.end - 0.02).abs() < 1e-12);
        assert!((p.start - 0.02).abs() < 1e-12);

        let p = Padding::parse("1% 2% 3%").unwrap();
        assert!((p.before - 0.01).abs() < 1e-12);
        assert!((p.end - 0.02).abs() < 1e-12);
        assert!((p.start - 0.02).abs() < 1e-12);
        assert!((p.after - 0.03).abs() < 1e-12);

        let p = Padding::parse("1% 2% 3% 4%").unwrap();
        assert!((p.start - 0.04).abs() < 1e-12);
        assert!((p.end - 0.02).abs() < 1e-12);

        assert!(Padding::parse("").is_err());
        assert!(Padding::parse("1% 2% 3% 4% 5%").is_err());
        assert!(Padding::parse("1% x%").is_err());
    }

    #[test]
    fn test_enumeration_vocabularies() {
        assert_eq!(Direction::parse("rtl").unwrap(), Direction::Rtl);
        assert!(Direction::parse("RTL").is_err());
        assert_eq!(DisplayAlign::parse("after").unwrap(), DisplayAlign::After);
        assert_eq!(Overflow::parse("visible").unwrap(), Overflow::Visible);
        assert_eq!(FontStyle::parse("italic").unwrap(), FontStyle::Italic);
        assert_eq!(FontWeight::parse("bold").unwrap(), FontWeight::Bold);
        assert_eq!(MultiRowAlign::parse("end").unwrap(), MultiRowAlign::End);
        assert_eq!(
            ShowBackground::parse("whenActive").unwrap(),
            ShowBackground::WhenActive
        );
        assert!(ShowBackground::parse("whenactive").is_err());
        assert_eq!(TextAlign::parse("right").unwrap(), TextAlign::Right);
        assert_eq!(
            TextDecoration::parse("underline").unwrap(),
            TextDecoration::Underline
        );
        assert_eq!(
            UnicodeBidi::parse("bidiOverride").unwrap(),
            UnicodeBidi::BidiOverride
        );
        assert_eq!(WrapOption::parse("noWrap").unwrap(), WrapOption::NoWrap);
        assert!(WrapOption::parse("nowrap").is_err());
        assert_eq!(Space::parse("preserve").unwrap(), Space::Preserve);
        assert!(Space::parse("keep").is_err());
    }

    #[test]
    fn test_writing_mode_abbreviations() {
        assert_eq!(WritingMode::parse("lrtb").unwrap(), WritingMode::Lrtb);
        assert_eq!(WritingMode::parse("lr").unwrap(), WritingMode::Lrtb);
        assert_eq!(WritingMode::parse("rl").unwrap(), WritingMode::Rltb);
        assert_eq!(WritingMode::parse("tb").unwrap(), WritingMode::Tbrl);
        assert_eq!(WritingMode::parse("tblr").unwrap(), WritingMode::Tblr);
        // tblr 没有缩写
        assert!(WritingMode::parse("bt").is_err());
    }

    #[test]
    fn test_line_height_parse() {
        assert_eq!(parse_line_height("normal").unwrap(), None);
        assert!((parse_line_height("120%").unwrap().unwrap() - 1.2).abs() < 1e-12);
        assert!(parse_line_height("120").is_err());
    }

    #[test]
    fn test_text_outline_parse() {
        assert_eq!(TextOutline::parse("none").unwrap(), None);

        let o = TextOutline::parse("10%").unwrap().unwrap();
        assert!(o.color.is_none());
        assert!((o.thickness - 0.1).abs() < 1e-12);
        assert!(o.blur_radius.is_none());

        let o = TextOutline::parse("#000000FF 10% 5%").unwrap().unwrap();
        assert_eq!(o.color.unwrap().alpha, 255);
        assert!((o.blur_radius.unwrap() - 0.05).abs() < 1e-12);

        // 只有颜色没有粗细
        assert!(TextOutline::parse("#000000FF").is_err());
        // 超过三个 token
        assert!(TextOutline::parse("#000000FF 10% 5% 1%").is_err());
        assert!(TextOutline::parse("").is_err());
    }

    #[test]
    fn test_merge_reports_touched_mask() {
        let mut resolved = ResolvedStyle::default();
        let mask = resolved.merge(&StyleProperties {
            font_size: Some(0.5),
            line_padding: Some(0.5),
            ..Default::default()
        });
        assert_eq!(mask, ComputeMask::FONT_SIZE | ComputeMask::LINE_PADDING);

        // 显式的 normal / none 也算触碰
        let mask = resolved.merge(&StyleProperties {
            line_height: Some(None),
            text_outline: Some(None),
            ..Default::default()
        });
        assert_eq!(mask, ComputeMask::LINE_HEIGHT | ComputeMask::TEXT_OUTLINE);

        let mask = resolved.merge(&StyleProperties {
            color: Some(Color::black()),
            ..Default::default()
        });
        assert!(mask.is_empty());
        assert_eq!(resolved.color, Color::black());
    }

    #[test]
    fn test_compute_seed_uses_cell_grid() {
        let mut resolved = ResolvedStyle::default();
        resolved.compute(ComputeMask::all(), None, CellResolution::default());
        assert!((resolved.font_size - 1.0 / 15.0).abs() < 1e-12);
        assert!(resolved.line_height.is_none());
        assert!((resolved.line_padding).abs() < 1e-12);
    }
}
