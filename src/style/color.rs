use crate::foundation::core::PropertyMap;
use serde_json::Value;

/// Property names whose values are colors.
pub const COLOR_PROPS: &[&str] = &[
    "backgroundColor",
    "borderBottomColor",
    "borderColor",
    "borderEndColor",
    "borderLeftColor",
    "borderRightColor",
    "borderStartColor",
    "borderTopColor",
    "color",
    "overlayColor",
    "shadowColor",
    "textDecorationColor",
    "textShadowColor",
    "tintColor",
];

/// Whether `name` is listed in [`COLOR_PROPS`].
pub fn is_color_prop(name: &str) -> bool {
    COLOR_PROPS.contains(&name)
}

/// Converts color values into the representation the view layer expects.
pub trait ColorNormalizer {
    /// Normalized value, or `None` to leave `value` untouched.
    fn normalize(&self, name: &str, value: &Value) -> Option<Value>;
}

/// Apply `normalizer` to the color properties of `props`. Removal markers are left alone.
pub fn normalize_colors(props: &mut PropertyMap, normalizer: &dyn ColorNormalizer) {
    for (name, value) in props.iter_mut() {
        if value.is_null() || !is_color_prop(name) {
            continue;
        }
        if let Some(n) = normalizer.normalize(name, value) {
            *value = n;
        }
    }
}

/// Packs `#rgb`, `#rrggbb` and `#rrggbbaa` strings into a `0xAARRGGBB` integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexColorNormalizer;

impl ColorNormalizer for HexColorNormalizer {
    fn normalize(&self, _name: &str, value: &Value) -> Option<Value> {
        let hex = value.as_str()?.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let digits = |s: &str| u32::from_str_radix(s, 16).ok();
        let (rgb, a) = match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                (digits(&expanded)?, 0xff)
            }
            6 => (digits(hex)?, 0xff),
            8 => (digits(&hex[..6])?, digits(&hex[6..])?),
            _ => return None,
        };
        Some(Value::from((a << 24) | rgb))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
