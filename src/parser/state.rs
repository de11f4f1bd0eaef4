//! # 解析器的状态机和数据结构

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::ParseError;
use crate::model::{Document, Span, StyleProperties};

/// 区域表的一个条目：区域在文档区域序列中的下标，
/// 以及该区域声明时携带的原始 `style` 引用字符串。
#[derive(Debug, Clone)]
pub(super) struct RegionEntry {
    pub(super) index: usize,
    pub(super) style: String,
}

/// 主解析器状态机，聚合了输出文档、各个查找表和实时作用域栈。
///
/// 每次解析调用独占一份，不在调用之间共享。
#[derive(Debug, Default)]
pub(super) struct ParserState {
    /// 正在构建的输出文档。
    pub(super) document: Document,
    /// 全文档范围的标识符注册表，跨元素种类唯一。
    pub(super) ids: HashSet<String>,
    /// 样式表：样式标识符 -> 原始属性集。头部处理完成后只读。
    pub(super) styles: HashMap<String, StyleProperties>,
    /// 区域表：区域标识符 -> 下标与样式引用。头部处理完成后只读。
    pub(super) regions: HashMap<String, RegionEntry>,
    /// 实时作用域栈：每个元素贡献一条原始样式引用字符串。
    /// 区域引用的样式插入队首（最外层），元素自身的样式压入队尾。
    pub(super) scope_stack: VecDeque<String>,

    /// 是否已经遇到 `<tt>` 根元素。
    pub(super) saw_root: bool,
    /// `<head>` 区域的解析状态。
    pub(super) head: HeadState,
    /// `<body>` 区域的解析状态。
    pub(super) body: BodyState,
}

impl ParserState {
    /// 把一个标识符登记到全文档注册表里，重复即报错。
    pub(super) fn register_id(&mut self, id: &str) -> Result<(), ParseError> {
        if !self.ids.insert(id.to_string()) {
            return Err(ParseError::DuplicateId(id.to_string()));
        }
        Ok(())
    }
}

/// `<head>` 内部的解析状态。
#[derive(Debug, Default)]
pub(super) struct HeadState {
    pub(super) count: u32,
    pub(super) in_head: bool,
    pub(super) styling_count: u32,
    pub(super) in_styling: bool,
    pub(super) layout_count: u32,
    pub(super) in_layout: bool,
}

/// `<body>` 内部的解析状态。
#[derive(Debug, Default)]
pub(super) struct BodyState {
    pub(super) count: u32,
    pub(super) in_body: bool,
    /// 正在跳过的子树的嵌套深度。div 里的 div、p 里的 p
    /// 连同整棵子树被忽略，期间作用域栈保持不动。
    pub(super) skip_depth: u32,
    /// body 自身是否向作用域栈压入了样式。
    pub(super) pushed_style: bool,
    /// 当前打开的 `<div>` 的上下文。
    pub(super) div: Option<DivFrame>,
    /// 当前打开的 `<p>` 的上下文。
    pub(super) paragraph: Option<ParagraphFrame>,
    /// `<span>` 的上下文堆栈。
    pub(super) span_stack: Vec<SpanFrame>,
}

/// 一个打开的 `<div>` 在作用域栈上留下的痕迹。
///
/// `pushed_*` 记录开始事件压入了哪些作用域，
/// 结束事件按原样弹出，保证栈与元素嵌套严格对应。
#[derive(Debug, Default)]
pub(super) struct DivFrame {
    /// div 自身 `region` 属性解析出的区域下标。
    pub(super) region_index: Option<usize>,
    pub(super) pushed_region_style: bool,
    pub(super) pushed_style: bool,
}

/// 一个打开的 `<p>` 在作用域栈上留下的痕迹。
#[derive(Debug, Default)]
pub(super) struct ParagraphFrame {
    pub(super) pushed_region_style: bool,
    pub(super) pushed_style: bool,
}

/// 一个打开的 `<span>` 的上下文：文本逐步累积到 `span.text`。
#[derive(Debug)]
pub(super) struct SpanFrame {
    pub(super) span: Span,
    pub(super) pushed_style: bool,
}
