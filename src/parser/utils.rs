//! # EBU-TT-D 解析器的工具函数
//!
//! 该模块提供属性提取和时间码解析的辅助函数。

use quick_xml::{Reader, events::BytesStart};

use crate::error::{ParseError, ValueError};

/// 获取并解码一个属性的原始字符串值。
pub(super) fn get_attribute(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    name: &[u8],
) -> Result<Option<String>, ParseError> {
    let Some(attr) = e.try_get_attribute(name)? else {
        return Ok(None);
    };
    let value = attr.decode_and_unescape_value(reader.decoder())?;
    Ok(Some(value.into_owned()))
}

/// 获取并去除首尾空白后的属性值；缺失或为空都返回 `None`。
pub(super) fn get_trimmed_attribute(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    name: &[u8],
) -> Result<Option<String>, ParseError> {
    Ok(get_attribute(e, reader, name)?
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// 获取一个属性并用给定的值解析器转换。
///
/// 值解析器的 [`ValueError`] 在这里被转换成带属性名与原始字面值的
/// [`ParseError::InvalidAttribute`]，保留诊断出处。
pub(super) fn parse_attribute<T>(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    name: &[u8],
    parse: impl FnOnce(&str) -> Result<T, ValueError>,
) -> Result<Option<T>, ParseError> {
    let Some(value) = get_attribute(e, reader, name)? else {
        return Ok(None);
    };
    match parse(&value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(ValueError(_)) => Err(ParseError::InvalidAttribute {
            attr: String::from_utf8_lossy(name).into_owned(),
            value,
        }),
    }
}

/// 获取并校验一个元素的 `xml:id`。
///
/// 属性存在但去除空白后为空是错误；`required` 时缺失也是错误。
pub(super) fn get_id(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    element: &'static str,
    required: bool,
) -> Result<Option<String>, ParseError> {
    match get_attribute(e, reader, super::constants::ATTR_XML_ID)? {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ParseError::EmptyId(element));
            }
            Ok(Some(trimmed.to_string()))
        }
        None if required => Err(ParseError::MissingAttribute {
            element,
            attr: "xml:id",
        }),
        None => Ok(None),
    }
}

/// 对时间码字面值的顺序扫描器。
struct Scanner<'a> {
    rest: &'a str,
}

impl Scanner<'_> {
    fn scan_char(&mut self, c: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(c)?;
        Some(())
    }

    /// 扫描一段十进制数字。`num_digits` 非零时要求恰好该宽度；
    /// `limit` 非零时要求数值不超过上限。
    fn scan_int(&mut self, num_digits: usize, limit: u64) -> Option<u64> {
        let count = self
            .rest
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if count == 0 || (num_digits > 0 && count != num_digits) {
            return None;
        }
        let n: u64 = self.rest[..count].parse().ok()?;
        if limit > 0 && n > limit {
            return None;
        }
        self.rest = &self.rest[count..];
        Some(n)
    }
}

/// 解析严格的 `H+:MM:SS.mmm` 时间码为秒数。
///
/// 小时字段宽度不限；分钟、秒恰好两位且不超过 59；
/// 毫秒恰好三位。任何偏差（宽度错误、越界、尾随字符）都是错误。
///
/// # Errors
///
/// 格式不符时返回携带原始字面值的 [`ValueError`]。
pub(super) fn parse_timecode(value: &str) -> Result<f64, ValueError> {
    #[allow(clippy::cast_precision_loss)]
    fn scan(input: &str) -> Option<f64> {
        let mut scanner = Scanner { rest: input };
        let mut secs = scanner.scan_int(0, 0)? as f64 * 3600.0;
        scanner.scan_char(':')?;
        secs += scanner.scan_int(2, 59)? as f64 * 60.0;
        scanner.scan_char(':')?;
        secs += scanner.scan_int(2, 59)? as f64;
        scanner.scan_char('.')?;
        secs += scanner.scan_int(3, 0)? as f64 * 0.001;
        if scanner.rest.is_empty() { Some(secs) } else { None }
    }
    scan(value.trim()).ok_or_else(|| ValueError::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timecode() {
        assert!((parse_timecode("01:02:03.456").unwrap() - 3723.456).abs() < 1e-9);
        // 一位小时是允许的：宽度不限
        assert!((parse_timecode("1:02:03.456").unwrap() - 3723.456).abs() < 1e-9);
        assert!((parse_timecode("00:00:00.000").unwrap()).abs() < 1e-9);
        assert!((parse_timecode("123:00:00.000").unwrap() - 442_800.0).abs() < 1e-9);
        assert!((parse_timecode("99:59:59.999").unwrap() - 359_999.999).abs() < 1e-9);

        // 字段越界
        assert!(parse_timecode("00:60:00.000").is_err());
        assert!(parse_timecode("00:00:60.000").is_err());
        // 宽度错误
        assert!(parse_timecode("00:02:03.4567").is_err());
        assert!(parse_timecode("00:02:03.45").is_err());
        assert!(parse_timecode("00:2:03.456").is_err());
        assert!(parse_timecode("00:02:3.456").is_err());
        // 结构错误
        assert!(parse_timecode("00:02:03").is_err());
        assert!(parse_timecode(":02:03.456").is_err());
        assert!(parse_timecode("00:02:03.456x").is_err());
        assert!(parse_timecode("00:02:03,456").is_err());
        assert!(parse_timecode("-1:02:03.456").is_err());
        assert!(parse_timecode("abc").is_err());
        assert!(parse_timecode("").is_err());
    }
}
