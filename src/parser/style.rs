//! # EBU-TT-D 解析器 - 样式级联解析
//!
//! 给定实时作用域栈（由外到内、每个作用域一条原始样式引用字符串）
//! 和样式表，产出最内层作用域的完整解析样式记录。
//!
//! 基准链式传递是正确性的关键：同一条样式声明被多个嵌套作用域
//! 引用时，必须按各自祖先作用域*已解析*的字号重新换算，
//! 所以换算发生在级联时、按作用域实例进行，而不是每条声明一次。

use std::collections::{HashMap, VecDeque};

use crate::error::ParseError;
use crate::model::{CellResolution, ComputeMask, ResolvedStyle, StyleProperties};

/// 解析一个作用域栈对应的最终计算样式。
///
/// 1. 记录初始化为类默认值，并立即以"无父基准"运行一次完整的
///    单位换算：名义上等于一个单元格行高的默认字号被换算成
///    画布的绝对比例，作为第 0 个作用域的父基准。
/// 2. 对每个作用域：若不是第一个作用域，先重置不继承的属性。
/// 3. 把引用字符串按空白切成样式标识符序列，逐条在样式表中查找
///    并合并（同一作用域内后出现的声明在冲突键上胜出），
///    累积本作用域触碰到的相对单位属性。
/// 4. 以上一个作用域解析完成的字号为父基准，对触碰到的属性运行
///    单位换算，并把换算结果记为传给下一个作用域的父基准。
///
/// # Errors
///
/// 引用了样式表中不存在的标识符时返回 [`ParseError::UnknownStyle`]。
pub(super) fn resolve_style(
    scope_stack: &VecDeque<String>,
    styles: &HashMap<String, StyleProperties>,
    cell_resolution: CellResolution,
) -> Result<ResolvedStyle, ParseError> {
    let mut resolved = ResolvedStyle::default();
    resolved.compute(ComputeMask::all(), None, cell_resolution);
    let mut parent_font_size = resolved.font_size;

    for (index, scope) in scope_stack.iter().enumerate() {
        if index != 0 {
            resolved.reset_non_inherited();
        }
        let mut mask = ComputeMask::empty();
        for id in scope.split_whitespace() {
            let properties = styles
                .get(id)
                .ok_or_else(|| ParseError::UnknownStyle(id.to_string()))?;
            mask |= resolved.merge(properties);
        }
        resolved.compute(mask, Some(parent_font_size), cell_resolution);
        parent_font_size = resolved.font_size;
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    fn style_table(entries: &[(&str, StyleProperties)]) -> HashMap<String, StyleProperties> {
        entries
            .iter()
            .map(|(id, props)| ((*id).to_string(), props.clone()))
            .collect()
    }

    fn scopes(refs: &[&str]) -> VecDeque<String> {
        refs.iter().map(|s| (*s).to_string()).collect()
    }

    const CELLS: CellResolution = CellResolution {
        columns: 32,
        rows: 15,
    };

    #[test]
    fn test_defaults_without_scopes() {
        let resolved = resolve_style(&scopes(&[]), &HashMap::new(), CELLS).unwrap();
        assert!((resolved.font_size - 1.0 / 15.0).abs() < 1e-12);
        assert_eq!(resolved.color, Color::white());
        assert_eq!(resolved.background_color, Color::transparent());
    }

    #[test]
    fn test_font_size_basis_chaining() {
        let styles = style_table(&[(
            "half",
            StyleProperties {
                font_size: Some(0.5),
                ..Default::default()
            },
        )]);
        // 同一条声明在不同深度引用时，换算基准是各自祖先的实际字号
        let one_level = resolve_style(&scopes(&["half"]), &styles, CELLS).unwrap();
        let two_levels = resolve_style(&scopes(&["half", "half"]), &styles, CELLS).unwrap();
        assert!((one_level.font_size - 0.5 / 15.0).abs() < 1e-12);
        assert!((two_levels.font_size - 0.25 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_inheriting_reset() {
        let styles = style_table(&[
            (
                "outer",
                StyleProperties {
                    background_color: Some(Color::black()),
                    color: Some(Color::black()),
                    ..Default::default()
                },
            ),
            (
                "inner",
                StyleProperties {
                    font_size: Some(0.5),
                    ..Default::default()
                },
            ),
        ]);
        let resolved = resolve_style(&scopes(&["outer", "inner"]), &styles, CELLS).unwrap();
        // 背景色不继承：内层作用域未重新声明时回到透明
        assert_eq!(resolved.background_color, Color::transparent());
        // 前景色继承：原样传递到内层作用域
        assert_eq!(resolved.color, Color::black());
    }

    #[test]
    fn test_same_scope_later_declaration_wins() {
        let styles = style_table(&[
            (
                "a",
                StyleProperties {
                    color: Some(Color::black()),
                    font_size: Some(0.5),
                    ..Default::default()
                },
            ),
            (
                "b",
                StyleProperties {
                    color: Some(Color::white()),
                    ..Default::default()
                },
            ),
        ]);
        let resolved = resolve_style(&scopes(&["a b"]), &styles, CELLS).unwrap();
        assert_eq!(resolved.color, Color::white());
        // 同一作用域只做一次换算：a 的字号仍按父基准换算
        assert!((resolved.font_size - 0.5 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_padding_uses_grid_basis() {
        let styles = style_table(&[(
            "padded",
            StyleProperties {
                line_padding: Some(0.5),
                font_size: Some(0.5),
                ..Default::default()
            },
        )]);
        let resolved = resolve_style(&scopes(&["padded"]), &styles, CELLS).unwrap();
        // 行内边距的基准是网格列数，与字号无关
        assert!((resolved.line_padding - 0.5 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_height_rederived_when_font_size_changes() {
        let styles = style_table(&[
            (
                "leaded",
                StyleProperties {
                    line_height: Some(Some(1.2)),
                    ..Default::default()
                },
            ),
            (
                "half",
                StyleProperties {
                    font_size: Some(0.5),
                    ..Default::default()
                },
            ),
        ]);
        // 外层声明行高，内层只改字号：行高按新字号重新推导
        let outer = resolve_style(&scopes(&["leaded"]), &styles, CELLS).unwrap();
        let inner = resolve_style(&scopes(&["leaded", "half"]), &styles, CELLS).unwrap();
        let outer_lh = outer.line_height.unwrap();
        let inner_lh = inner.line_height.unwrap();
        assert!((outer_lh - 1.2 / 15.0).abs() < 1e-12);
        assert!((inner_lh - outer_lh * inner.font_size).abs() < 1e-12);
    }

    #[test]
    fn test_text_outline_scales_with_font_size() {
        let styles = style_table(&[(
            "outlined",
            StyleProperties {
                font_size: Some(0.5),
                text_outline: Some(Some(crate::model::TextOutline {
                    color: None,
                    thickness: 0.1,
                    blur_radius: Some(0.05),
                })),
                ..Default::default()
            },
        )]);
        let resolved = resolve_style(&scopes(&["outlined"]), &styles, CELLS).unwrap();
        let outline = resolved.text_outline.unwrap();
        let font_size = resolved.font_size;
        assert!((outline.thickness - 0.1 * font_size).abs() < 1e-12);
        assert!((outline.blur_radius.unwrap() - 0.05 * font_size).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_style_id() {
        let result = resolve_style(&scopes(&["missing"]), &HashMap::new(), CELLS);
        assert!(matches!(result, Err(ParseError::UnknownStyle(id)) if id == "missing"));
    }
}
