//! # EBU-TT-D 解析器 - Head 处理模块
//!
//! 该模块处理 `<head>` 块：从 `<styling>` 构建样式表，
//! 从 `<layout>` 构建区域表。两张表在头部处理完成后只读。

use quick_xml::{Reader, events::BytesStart};

use super::constants::{
    ATTR_BACKGROUND_COLOR, ATTR_COLOR, ATTR_DIRECTION, ATTR_DISPLAY_ALIGN, ATTR_EXTENT,
    ATTR_FILL_LINE_GAP, ATTR_FONT_FAMILY, ATTR_FONT_SIZE, ATTR_FONT_STYLE, ATTR_FONT_WEIGHT,
    ATTR_LINE_HEIGHT, ATTR_LINE_PADDING, ATTR_MULTI_ROW_ALIGN, ATTR_ORIGIN, ATTR_OVERFLOW,
    ATTR_PADDING, ATTR_SHOW_BACKGROUND, ATTR_STYLE, ATTR_TEXT_ALIGN, ATTR_TEXT_DECORATION,
    ATTR_TEXT_OUTLINE, ATTR_UNICODE_BIDI, ATTR_WRAP_OPTION, ATTR_WRITING_MODE,
};
use super::state::{ParserState, RegionEntry};
use super::utils::{get_attribute, get_id, get_trimmed_attribute, parse_attribute};
use crate::error::ParseError;
use crate::model::{
    Color, Direction, DisplayAlign, Extent, FontStyle, FontWeight, MultiRowAlign, Origin,
    Overflow, Padding, Region, ShowBackground, StyleProperties, TextAlign, TextDecoration,
    TextOutline, Unit, UnicodeBidi, WrapOption, WritingMode, parse_line_height,
};

pub(super) fn open_head(state: &mut ParserState) -> Result<(), ParseError> {
    state.head.count += 1;
    if state.head.count > 1 {
        return Err(ParseError::DuplicateElement("head"));
    }
    state.head.in_head = true;
    Ok(())
}

pub(super) fn close_head(state: &mut ParserState) -> Result<(), ParseError> {
    state.head.in_head = false;
    if state.head.styling_count == 0 {
        return Err(ParseError::MissingElement("styling"));
    }
    if state.head.layout_count == 0 {
        return Err(ParseError::MissingElement("layout"));
    }
    Ok(())
}

pub(super) fn open_styling(state: &mut ParserState) -> Result<(), ParseError> {
    state.head.styling_count += 1;
    if state.head.styling_count > 1 {
        return Err(ParseError::DuplicateElement("styling"));
    }
    state.head.in_styling = true;
    Ok(())
}

pub(super) fn close_styling(state: &mut ParserState) -> Result<(), ParseError> {
    state.head.in_styling = false;
    if state.styles.is_empty() {
        return Err(ParseError::MissingElement("style"));
    }
    Ok(())
}

pub(super) fn open_layout(state: &mut ParserState) -> Result<(), ParseError> {
    state.head.layout_count += 1;
    if state.head.layout_count > 1 {
        return Err(ParseError::DuplicateElement("layout"));
    }
    state.head.in_layout = true;
    Ok(())
}

pub(super) fn close_layout(state: &mut ParserState) -> Result<(), ParseError> {
    state.head.in_layout = false;
    if state.document.regions.is_empty() {
        return Err(ParseError::MissingElement("region"));
    }
    Ok(())
}

/// 处理一条 `<style>` 声明：登记标识符，
/// 把声明的属性原样（不做单位换算）存入样式表。
pub(super) fn process_style(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    let id = get_id(e, reader, "style", true)?
        .ok_or_else(|| ParseError::Internal("样式标识符缺失".to_string()))?;
    state.register_id(&id)?;

    let mut properties = StyleProperties {
        background_color: parse_attribute(e, reader, ATTR_BACKGROUND_COLOR, Color::parse)?,
        color: parse_attribute(e, reader, ATTR_COLOR, Color::parse)?,
        direction: parse_attribute(e, reader, ATTR_DIRECTION, Direction::parse)?,
        font_size: parse_attribute(e, reader, ATTR_FONT_SIZE, |v| {
            Unit::Percent.parse(v, None)
        })?,
        font_style: parse_attribute(e, reader, ATTR_FONT_STYLE, FontStyle::parse)?,
        font_weight: parse_attribute(e, reader, ATTR_FONT_WEIGHT, FontWeight::parse)?,
        line_height: parse_attribute(e, reader, ATTR_LINE_HEIGHT, parse_line_height)?,
        line_padding: parse_attribute(e, reader, ATTR_LINE_PADDING, |v| {
            Unit::Cell.parse(v, None)
        })?,
        multi_row_align: parse_attribute(e, reader, ATTR_MULTI_ROW_ALIGN, MultiRowAlign::parse)?,
        text_align: parse_attribute(e, reader, ATTR_TEXT_ALIGN, TextAlign::parse)?,
        text_decoration: parse_attribute(e, reader, ATTR_TEXT_DECORATION, TextDecoration::parse)?,
        text_outline: parse_attribute(e, reader, ATTR_TEXT_OUTLINE, TextOutline::parse)?,
        unicode_bidi: parse_attribute(e, reader, ATTR_UNICODE_BIDI, UnicodeBidi::parse)?,
        wrap_option: parse_attribute(e, reader, ATTR_WRAP_OPTION, WrapOption::parse)?,
        ..Default::default()
    };
    if let Some(value) = get_attribute(e, reader, ATTR_FILL_LINE_GAP)? {
        properties.fill_line_gap = Some(match value.trim() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ParseError::InvalidAttribute {
                    attr: "itts:fillLineGap".to_string(),
                    value,
                });
            }
        });
    }
    if let Some(value) = get_attribute(e, reader, ATTR_FONT_FAMILY)? {
        properties.font_family = Some(
            value
                .trim()
                .split(',')
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        );
    }

    state.styles.insert(id, properties);
    Ok(())
}

/// 处理一条 `<region>` 声明：登记标识符，把区域追加到文档的
/// 区域序列，并在区域表中记录其下标与原始样式引用。
pub(super) fn process_region(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    let id = get_id(e, reader, "region", true)?
        .ok_or_else(|| ParseError::Internal("区域标识符缺失".to_string()))?;
    state.register_id(&id)?;

    let origin = parse_attribute(e, reader, ATTR_ORIGIN, Origin::parse)?.ok_or(
        ParseError::MissingAttribute {
            element: "region",
            attr: "tts:origin",
        },
    )?;
    let extent = parse_attribute(e, reader, ATTR_EXTENT, Extent::parse)?.ok_or(
        ParseError::MissingAttribute {
            element: "region",
            attr: "tts:extent",
        },
    )?;

    let region = Region {
        origin,
        extent,
        display_align: parse_attribute(e, reader, ATTR_DISPLAY_ALIGN, DisplayAlign::parse)?
            .unwrap_or_default(),
        overflow: parse_attribute(e, reader, ATTR_OVERFLOW, Overflow::parse)?.unwrap_or_default(),
        padding: parse_attribute(e, reader, ATTR_PADDING, Padding::parse)?.unwrap_or_default(),
        show_background: parse_attribute(e, reader, ATTR_SHOW_BACKGROUND, ShowBackground::parse)?
            .unwrap_or_default(),
        writing_mode: parse_attribute(e, reader, ATTR_WRITING_MODE, WritingMode::parse)?
            .unwrap_or_default(),
    };

    let style = get_trimmed_attribute(e, reader, ATTR_STYLE)?.unwrap_or_default();
    state.regions.insert(
        id,
        RegionEntry {
            index: state.document.regions.len(),
            style,
        },
    );
    state.document.regions.push(region);
    Ok(())
}
