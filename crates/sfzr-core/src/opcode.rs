//! Instrument opcodes as handed over by the instrument parser

use crate::{ParamRange, SfzrError, SfzrResult};

/// A single `name=value` pair from an instrument description.
///
/// `letters_only` is the name with every run of digits replaced by `&`,
/// so numbered opcodes (`eq1_freq`, `eq2_freq`) share one key (`eq&_freq`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub name: String,
    pub value: String,
    pub letters_only: String,
}

impl Opcode {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let letters_only = letters_only(&name);
        Self {
            name,
            value: value.into(),
            letters_only,
        }
    }

    /// Parse the leading number of the value and clamp it into `range`
    pub fn read(&self, range: &ParamRange) -> SfzrResult<f32> {
        let raw = read_leading_float(&self.value).ok_or_else(|| SfzrError::InvalidOpcodeValue {
            opcode: self.name.clone(),
            value: self.value.clone(),
        })?;

        let value = range.clamp(raw);
        if value != raw {
            log::debug!(
                "Opcode {}={} clamped to {} (range {}..={})",
                self.name,
                self.value,
                value,
                range.min,
                range.max
            );
        }
        Ok(value)
    }
}

/// Replace every run of ASCII digits with a single `&`
pub fn letters_only(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut in_digits = false;
    for c in name.chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                key.push('&');
            }
            in_digits = true;
        } else {
            key.push(c);
            in_digits = false;
        }
    }
    key
}

/// Read a float from the start of `text`, ignoring any trailing garbage
/// (`"1000hz"` reads as `1000.0`).
pub fn read_leading_float(text: &str) -> Option<f32> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it is complete
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FILTER_CUTOFF_RANGE;

    #[test]
    fn test_letters_only() {
        assert_eq!(letters_only("filter_cutoff"), "filter_cutoff");
        assert_eq!(letters_only("eq1_freq"), "eq&_freq");
        assert_eq!(letters_only("amplitude_cc127"), "amplitude_cc&");
        assert_eq!(letters_only("a12b3"), "a&b&");
    }

    #[test]
    fn test_read_leading_float() {
        assert_eq!(read_leading_float("1000"), Some(1000.0));
        assert_eq!(read_leading_float("  -3.5"), Some(-3.5));
        assert_eq!(read_leading_float("1000hz"), Some(1000.0));
        assert_eq!(read_leading_float(".5"), Some(0.5));
        assert_eq!(read_leading_float("2."), Some(2.0));
        assert_eq!(read_leading_float("1e3"), Some(1000.0));
        assert_eq!(read_leading_float("1e"), Some(1.0));
        assert_eq!(read_leading_float("lpf_2p"), None);
        assert_eq!(read_leading_float(""), None);
        assert_eq!(read_leading_float("-"), None);
    }

    #[test]
    fn test_read_clamps() {
        let opcode = Opcode::new("filter_cutoff", "30000");
        assert_eq!(opcode.read(&FILTER_CUTOFF_RANGE).unwrap(), 20_000.0);

        let opcode = Opcode::new("filter_cutoff", "-10");
        assert_eq!(opcode.read(&FILTER_CUTOFF_RANGE).unwrap(), 0.0);
    }

    #[test]
    fn test_read_rejects_garbage() {
        let opcode = Opcode::new("filter_cutoff", "bright");
        assert!(matches!(
            opcode.read(&FILTER_CUTOFF_RANGE),
            Err(SfzrError::InvalidOpcodeValue { .. })
        ));
    }
}
