//! # EBU-TT-D (EBU Timed Text, Distribution) 解析器
//!
//! 该解析器面向分发用途的 EBU-TT-D 字幕文档：单遍流式读取，
//! 边读边做样式级联解析，产出所有样式都已绝对化的 [`Document`]。
//! 任何违反文档约束的输入都会让整个解析立即失败。

mod body;
mod constants;
mod head;
mod state;
mod style;
mod utils;

use quick_xml::{Reader, events::{BytesStart, Event}};
use tracing::error;

use self::constants::{
    ATTR_ACTIVE_AREA, ATTR_CELL_RESOLUTION, ATTR_TIME_BASE, ATTR_XML_LANG, ATTR_XML_SPACE,
    TAG_BODY, TAG_BR, TAG_DIV, TAG_HEAD, TAG_LAYOUT, TAG_P, TAG_REGION, TAG_SPAN, TAG_STYLE,
    TAG_STYLING, TAG_TT,
};
use self::state::ParserState;
use self::utils::{get_attribute, get_trimmed_attribute, parse_attribute};
use crate::error::ParseError;
use crate::model::{ActiveArea, CellResolution, Document, Space};

/// 解析 EBU-TT-D 格式的字幕文档。
///
/// # 参数
///
/// * `content` - EBU-TT-D 格式的字幕文档内容字符串。
///
/// # 返回
///
/// * `Ok(Document)` - 成功解析后，返回完整的字幕文档。所有样式引用
///   都已消解：继承已应用、相对单位已换算成画布的绝对比例。
/// * `Err(ParseError)` - 解析失败时，返回第一个遇到的错误。
///
/// # Errors
///
/// 此函数在以下情况下会返回错误：
///
/// * `ParseError::Xml` - 当输入不是良构的 XML 时
/// * `ParseError::MissingElement` / `ParseError::DuplicateElement` -
///   当文档结构违反基数约束时（如缺少 `<head>`、多个 `<body>`）
/// * `ParseError::InvalidAttribute` - 当某个属性的字面值无法解析时
/// * `ParseError::UnknownStyle` / `ParseError::UnknownRegion` -
///   当样式或区域引用指向不存在的声明时
pub fn parse_ebuttd(content: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = true;

    let mut state = ParserState::default();
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    "EBU-TT-D 解析错误，位置 {}: {}。无法继续解析",
                    reader.error_position(),
                    e
                );
                return Err(ParseError::Xml(e));
            }
        };

        match event {
            Event::Start(e) => {
                if state.body.skip_depth > 0 {
                    state.body.skip_depth += 1;
                } else {
                    handle_start(&e, &reader, &mut state)?;
                }
            }
            Event::End(e) => {
                if state.body.skip_depth > 0 {
                    state.body.skip_depth -= 1;
                } else {
                    handle_end(e.local_name().as_ref(), &mut state)?;
                }
            }
            Event::Text(e) => {
                // 跨度之外的字符数据（通常是缩进）不属于任何实体
                if state.body.skip_depth == 0 && !state.body.span_stack.is_empty() {
                    let text = e.xml_content()?;
                    body::append_text(&mut state, &text);
                }
            }
            Event::GeneralRef(e) => {
                if state.body.skip_depth == 0 && !state.body.span_stack.is_empty() {
                    let entity = str::from_utf8(e.as_ref()).map_err(|err| {
                        ParseError::Internal(format!("无法将实体名解码为 UTF-8: {err}"))
                    })?;
                    let decoded = decode_entity(entity)?;
                    body::append_text(&mut state, decoded.encode_utf8(&mut [0; 4]));
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if !state.saw_root {
        return Err(ParseError::MissingElement("tt"));
    }
    if state.head.count == 0 {
        return Err(ParseError::MissingElement("head"));
    }
    if state.body.count == 0 {
        return Err(ParseError::MissingElement("body"));
    }
    Ok(state.document)
}

/// 把开始事件按元素名和当前所处的结构位置分发给对应的处理函数。
/// 位置不符的已知元素和一切未知元素都被跳过。
fn handle_start(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
) -> Result<(), ParseError> {
    let name = e.local_name();
    let name = name.as_ref();
    if !state.saw_root {
        return handle_root(e, reader, state, name);
    }
    match name {
        TAG_HEAD => head::open_head(state),
        TAG_STYLING if state.head.in_head => head::open_styling(state),
        TAG_STYLE if state.head.in_styling => head::process_style(e, reader, state),
        TAG_LAYOUT if state.head.in_head => head::open_layout(state),
        TAG_REGION if state.head.in_layout => head::process_region(e, reader, state),
        TAG_BODY => body::open_body(e, reader, state),
        TAG_DIV if state.body.in_body && state.body.div.is_none() => {
            body::open_div(e, reader, state)
        }
        TAG_P if state.body.div.is_some() && state.body.paragraph.is_none() => {
            body::open_paragraph(e, reader, state)
        }
        // div 里的 div、p 里的 p：整棵子树忽略
        TAG_DIV if state.body.in_body => {
            state.body.skip_depth = 1;
            Ok(())
        }
        TAG_P if state.body.div.is_some() => {
            state.body.skip_depth = 1;
            Ok(())
        }
        TAG_SPAN if state.body.paragraph.is_some() => body::open_span(e, reader, state),
        TAG_BR => body::handle_br(state),
        _ => Ok(()),
    }
}

fn handle_end(name: &[u8], state: &mut ParserState) -> Result<(), ParseError> {
    match name {
        TAG_HEAD if state.head.in_head => head::close_head(state),
        TAG_STYLING if state.head.in_styling => head::close_styling(state),
        TAG_LAYOUT if state.head.in_layout => head::close_layout(state),
        TAG_BODY if state.body.in_body => body::close_body(state),
        TAG_DIV if state.body.div.is_some() => body::close_div(state),
        TAG_SPAN if !state.body.span_stack.is_empty() => body::close_span(state),
        TAG_P if state.body.paragraph.is_some() => body::close_paragraph(state),
        _ => Ok(()),
    }
}

/// 处理 `<tt>` 根元素：校验计时基准，读取文档级属性。
fn handle_root(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    state: &mut ParserState,
    name: &[u8],
) -> Result<(), ParseError> {
    if name != TAG_TT {
        return Err(ParseError::InvalidRoot(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }
    state.saw_root = true;

    let time_base = get_trimmed_attribute(e, reader, ATTR_TIME_BASE)?.ok_or(
        ParseError::MissingAttribute {
            element: "tt",
            attr: "ttp:timeBase",
        },
    )?;
    if time_base != "media" {
        return Err(ParseError::InvalidAttribute {
            attr: "ttp:timeBase".to_string(),
            value: time_base,
        });
    }

    // xml:lang 必须存在，但允许为空
    let language = get_attribute(e, reader, ATTR_XML_LANG)?.ok_or(
        ParseError::MissingAttribute {
            element: "tt",
            attr: "xml:lang",
        },
    )?;
    state.document.language = language.trim().to_string();

    if let Some(resolution) =
        parse_attribute(e, reader, ATTR_CELL_RESOLUTION, CellResolution::parse)?
    {
        state.document.cell_resolution = resolution;
    }
    if let Some(area) = parse_attribute(e, reader, ATTR_ACTIVE_AREA, ActiveArea::parse)? {
        state.document.active_area = area;
    }
    if let Some(space) = parse_attribute(e, reader, ATTR_XML_SPACE, Space::parse)? {
        state.document.space = space;
    }
    Ok(())
}

/// 解码一个 XML 实体引用：五个预定义实体加数字字符引用。
fn decode_entity(entity: &str) -> Result<char, ParseError> {
    if let Some(num) = entity.strip_prefix('#') {
        let (radix, digits) = num
            .strip_prefix('x')
            .map_or((10, num), |stripped| (16, stripped));
        return u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| ParseError::UnknownEntity(entity.to_string()));
    }
    match entity {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => Err(ParseError::UnknownEntity(entity.to_string())),
    }
}
