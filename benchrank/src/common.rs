use lazy_static::lazy_static;
use serde::de::Visitor;
use serde_with::DeserializeAs;

use crate::error::{Error, Result};

/// Split a spreadsheet label into the device name and the attribute in parentheses.
///
/// ## Example
/// ```txt
/// "Nokia 1 (Snapdragon 450)"          -> ("Nokia 1", "Snapdragon 450")
/// "Samsung Galaxy Note 9 (4000 mAh)"  -> ("Samsung Galaxy Note 9", "4000 mAh")
/// "Pixel 3 (XL) (Snapdragon 845)"     -> ("Pixel 3 (XL)", "Snapdragon 845")
/// ```
///
/// # Errors
/// [`Error::MalformedLabel`] if there is no parenthesized group or no name before it.
pub fn split_label(raw: &str) -> Result<(String, String)> {
    lazy_static! {
        static ref RE_LABEL: regex::Regex = regex::Regex::new(r"^(.*)\((.*)\)").unwrap();
    }

    let malformed = || Error::MalformedLabel {
        label: raw.to_string(),
    };

    let captures = RE_LABEL.captures(raw).ok_or_else(malformed)?;
    let name = captures[1].trim();
    if name.is_empty() {
        return Err(malformed());
    }
    Ok((name.to_string(), captures[2].trim().to_string()))
}

/// Parse an integer score cell, ignoring thousands separators.
///
/// ## Example
/// ```txt
/// "3412"    -> 3412
/// " 3412 "  -> 3412
/// "231,540" -> 231540
/// "12.5"    -> None
/// ```
pub(crate) fn parse_score<T: AsRef<str>>(s: T) -> Option<i64> {
    let s = s.as_ref().trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "").parse::<i64>().ok()
}

/// Read any scalar JSON cell as text.
///
/// Spreadsheet exports mix strings, numbers and blanks in the same column,
/// e.g. `["+", "01.02.2019", "Nokia 1 (Snapdragon 450)", 3412, null]`.
/// Whole floats are written without the fractional part so `3412.0` reads as `"3412"`.
pub struct CellText;

impl<'de> DeserializeAs<'de, Option<String>> for CellText {
    fn deserialize_as<D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Helper;

        impl<'de> Visitor<'de> for Helper {
            type Value = Option<String>;

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(v.to_string()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(Some((v as i64).to_string()))
                } else {
                    Ok(Some(v.to_string()))
                }
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(v.to_string()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a spreadsheet cell (string, number, boolean or null)")
            }
        }

        deserializer.deserialize_any(Helper)
    }
}
