//! # EBU-TT-D 解析器 - Body 处理模块
//!
//! 该模块处理 `<body>` 块的结构事件：div、段落、文本跨度与强制换行。
//! 每个开始事件把元素携带的样式引用压入作用域栈并立即做一次级联解析，
//! 对应的结束事件按压入痕迹原样弹出。

use quick_xml::{Reader, events::BytesStart};

use super::constants::{
    ATTR_BEGIN, ATTR_END, ATTR_REGION, ATTR_STYLE, ATTR_XML_LANG, ATTR_XML_SPACE,
};
use super::state::{DivFrame, ParagraphFrame, ParserState, SpanFrame};
use super::style::resolve_style;
use super::utils::{get_id, get_trimmed_attribute, parse_attribute, parse_timecode};
use crate::error::ParseError;
use crate::model::{Div, InlineContent, Paragraph, Space, Span};

/// 若元素带有非空的 `style` 引用，压入作用域栈队尾。
fn push_element_style(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<bool, ParseError> {
    if let Some(style) = get_trimmed_attribute(e, reader, ATTR_STYLE)? {
        state.scope_stack.push_back(style);
        Ok(true)
    } else {
        Ok(false)
    }
}

/// 当前打开的段落实体。段落在开始事件就已挂入文档树。
fn current_paragraph_mut(state: &mut ParserState) -> Result<&mut Paragraph, ParseError> {
    state
        .document
        .body
        .divs
        .last_mut()
        .and_then(|div| div.paragraphs.last_mut())
        .ok_or_else(|| ParseError::Internal("当前没有打开的段落".to_string()))
}

pub(super) fn open_body(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    state.body.count += 1;
    if state.body.count > 1 {
        return Err(ParseError::DuplicateElement("body"));
    }
    if state.head.count == 0 {
        return Err(ParseError::MissingElement("head"));
    }
    state.body.in_body = true;
    state.body.pushed_style = push_element_style(e, reader, state)?;
    let resolved = resolve_style(
        &state.scope_stack,
        &state.styles,
        state.document.cell_resolution,
    )?;
    state.document.body.background_color = resolved.background_color;
    Ok(())
}

pub(super) fn close_body(state: &mut ParserState) -> Result<(), ParseError> {
    state.body.in_body = false;
    if state.body.pushed_style {
        state.scope_stack.pop_back();
        state.body.pushed_style = false;
    }
    if state.document.body.divs.is_empty() {
        return Err(ParseError::MissingElement("div"));
    }
    Ok(())
}

pub(super) fn open_div(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    let id = get_id(e, reader, "div", false)?;
    if let Some(id) = &id {
        state.register_id(id)?;
    }
    let language = get_trimmed_attribute(e, reader, ATTR_XML_LANG)?.unwrap_or_default();

    let mut frame = DivFrame::default();
    if let Some(region_ref) = get_trimmed_attribute(e, reader, ATTR_REGION)? {
        let entry = state
            .regions
            .get(&region_ref)
            .ok_or_else(|| ParseError::UnknownRegion(region_ref.clone()))?;
        frame.region_index = Some(entry.index);
        // 区域引用的样式是最外层作用域
        if !entry.style.is_empty() {
            let style = entry.style.clone();
            state.scope_stack.push_front(style);
            frame.pushed_region_style = true;
        }
    }
    frame.pushed_style = push_element_style(e, reader, state)?;

    let resolved = resolve_style(
        &state.scope_stack,
        &state.styles,
        state.document.cell_resolution,
    )?;
    state.document.body.divs.push(Div {
        id: id.unwrap_or_default(),
        language,
        background_color: resolved.background_color,
        paragraphs: Vec::new(),
    });
    state.body.div = Some(frame);
    Ok(())
}

pub(super) fn close_div(state: &mut ParserState) -> Result<(), ParseError> {
    let frame = state
        .body
        .div
        .take()
        .ok_or_else(|| ParseError::Internal("div 结束事件没有对应的上下文".to_string()))?;
    if frame.pushed_style {
        state.scope_stack.pop_back();
    }
    if frame.pushed_region_style {
        state.scope_stack.pop_front();
    }
    let div = state
        .document
        .body
        .divs
        .last()
        .ok_or_else(|| ParseError::Internal("div 结束事件没有对应的实体".to_string()))?;
    if div.paragraphs.is_empty() {
        return Err(ParseError::MissingElement("p"));
    }
    Ok(())
}

pub(super) fn open_paragraph(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    let id = get_id(e, reader, "p", true)?
        .ok_or_else(|| ParseError::Internal("段落标识符缺失".to_string()))?;
    state.register_id(&id)?;

    let begin_secs = parse_attribute(e, reader, ATTR_BEGIN, parse_timecode)?.ok_or(
        ParseError::MissingAttribute {
            element: "p",
            attr: "begin",
        },
    )?;
    let end_secs = parse_attribute(e, reader, ATTR_END, parse_timecode)?.ok_or(
        ParseError::MissingAttribute {
            element: "p",
            attr: "end",
        },
    )?;

    let div_region = state.body.div.as_ref().and_then(|frame| frame.region_index);
    let mut frame = ParagraphFrame::default();
    // 段落自己的区域引用先解析：悬空引用优先于区域冲突报告
    let own_region = match get_trimmed_attribute(e, reader, ATTR_REGION)? {
        Some(region_ref) => {
            let entry = state
                .regions
                .get(&region_ref)
                .ok_or_else(|| ParseError::UnknownRegion(region_ref.clone()))?;
            Some((entry.index, entry.style.clone()))
        }
        None => None,
    };
    let region_index = match (own_region, div_region) {
        (Some(_), Some(_)) => return Err(ParseError::ConflictingRegion),
        (Some((index, style)), None) => {
            if !style.is_empty() {
                state.scope_stack.push_front(style);
                frame.pushed_region_style = true;
            }
            index
        }
        (None, Some(index)) => index,
        (None, None) => {
            return Err(ParseError::MissingAttribute {
                element: "p",
                attr: "region",
            });
        }
    };

    let language = get_trimmed_attribute(e, reader, ATTR_XML_LANG)?.unwrap_or_default();
    let space = parse_attribute(e, reader, ATTR_XML_SPACE, Space::parse)?.unwrap_or_default();

    frame.pushed_style = push_element_style(e, reader, state)?;
    let resolved = resolve_style(
        &state.scope_stack,
        &state.styles,
        state.document.cell_resolution,
    )?;

    let paragraph = Paragraph {
        id,
        begin_secs,
        end_secs,
        region_index,
        language,
        space,
        background_color: resolved.background_color,
        direction: resolved.direction,
        fill_line_gap: resolved.fill_line_gap,
        line_height: resolved.line_height,
        line_padding: resolved.line_padding,
        multi_row_align: resolved.multi_row_align,
        text_align: resolved.text_align,
        unicode_bidi: resolved.unicode_bidi,
        contents: Vec::new(),
    };
    state
        .document
        .body
        .divs
        .last_mut()
        .ok_or_else(|| ParseError::Internal("段落出现在 div 之外".to_string()))?
        .paragraphs
        .push(paragraph);
    state.body.paragraph = Some(frame);
    Ok(())
}

pub(super) fn close_paragraph(state: &mut ParserState) -> Result<(), ParseError> {
    let frame = state
        .body
        .paragraph
        .take()
        .ok_or_else(|| ParseError::Internal("p 结束事件没有对应的上下文".to_string()))?;
    if frame.pushed_style {
        state.scope_stack.pop_back();
    }
    if frame.pushed_region_style {
        state.scope_stack.pop_front();
    }
    Ok(())
}

pub(super) fn open_span(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    let id = get_id(e, reader, "span", false)?;
    if let Some(id) = &id {
        state.register_id(id)?;
    }

    let language = get_trimmed_attribute(e, reader, ATTR_XML_LANG)?.unwrap_or_default();
    let space = parse_attribute(e, reader, ATTR_XML_SPACE, Space::parse)?.unwrap_or_default();

    let pushed_style = push_element_style(e, reader, state)?;
    let resolved = resolve_style(
        &state.scope_stack,
        &state.styles,
        state.document.cell_resolution,
    )?;

    let span = Span {
        id: id.unwrap_or_default(),
        language,
        space,
        background_color: resolved.background_color,
        color: resolved.color,
        direction: resolved.direction,
        font_family: resolved.font_family,
        font_size: resolved.font_size,
        font_style: resolved.font_style,
        font_weight: resolved.font_weight,
        text_decoration: resolved.text_decoration,
        text_outline: resolved.text_outline,
        unicode_bidi: resolved.unicode_bidi,
        wrap_option: resolved.wrap_option,
        text: String::new(),
    };
    state.body.span_stack.push(SpanFrame { span, pushed_style });
    Ok(())
}

pub(super) fn close_span(state: &mut ParserState) -> Result<(), ParseError> {
    let frame = state
        .body
        .span_stack
        .pop()
        .ok_or_else(|| ParseError::Internal("span 结束事件没有对应的上下文".to_string()))?;
    if frame.pushed_style {
        state.scope_stack.pop_back();
    }
    current_paragraph_mut(state)?
        .contents
        .push(InlineContent::Span(frame.span));
    Ok(())
}

/// 处理 `<br/>`：只在段落内、跨度之外有效，其余位置忽略。
pub(super) fn handle_br(state: &mut ParserState) -> Result<(), ParseError> {
    if state.body.paragraph.is_some() && state.body.span_stack.is_empty() {
        current_paragraph_mut(state)?
            .contents
            .push(InlineContent::Br);
    }
    Ok(())
}

/// 把一段字符数据累积到最内层打开的跨度；跨度之外的文本忽略。
pub(super) fn append_text(state: &mut ParserState, text: &str) {
    if let Some(frame) = state.body.span_stack.last_mut() {
        frame.span.text.push_str(text);
    }
}
