//! Render modifier model
//!
//! A [`ModifierSet`] is the canonical, validated form of the modifier tokens
//! embedded in a request filename (e.g. `size:100x100`, `grayscale`). Tokens
//! are matched against a fixed, ordered list of operator patterns; the first
//! matching pattern wins per token, unknown tokens are silently dropped so
//! newer URLs keep working against older deployments, and the last
//! occurrence of an operator wins when duplicated.
//!
//! Serialization sorts tokens alphabetically and joins them with `_`, so any
//! two equivalent modifier sets produce the same canonical string. That
//! string is what URL generation embeds and what the render cache keys on.

use regex::Regex;
use std::sync::LazyLock;

/// Resize/pad strategy applied when target dimensions are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// `lpad`: scale down-only into the box, then center on a canvas of
    /// exactly the box dimensions filled with the background color.
    PadLimit,
    /// `lim`: scale down-only into the box, no canvas padding.
    Limit,
    /// `scale`: aspect-preserving resize into the box, upscaling allowed.
    Scale,
    /// `resize`: force exact box dimensions, aspect ratio ignored.
    Resize,
}

impl FitMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lpad" => Some(FitMode::PadLimit),
            "lim" => Some(FitMode::Limit),
            "scale" => Some(FitMode::Scale),
            "resize" => Some(FitMode::Resize),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::PadLimit => "lpad",
            FitMode::Limit => "lim",
            FitMode::Scale => "scale",
            FitMode::Resize => "resize",
        }
    }
}

/// Crop insets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    /// `crop:N` - inset all four sides by N
    Uniform(u32),
    /// `crop:T,R,B,L` - per-side insets
    PerSide {
        top: u32,
        right: u32,
        bottom: u32,
        left: u32,
    },
}

/// Ordered, validated set of render modifiers. Each operator appears at
/// most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierSet {
    /// Target box from `size:WxH`
    pub size: Option<(u32, u32)>,
    pub fit: Option<FitMode>,
    pub grayscale: bool,
    /// Encode quality, clamped to 1-100 at parse time
    pub quality: Option<u8>,
    /// Background hex color (6 lowercase hex digits, no `#`)
    pub bgcolor: Option<String>,
    /// Trim tolerance, clamped to 1-99 at parse time
    pub trim: Option<u8>,
    pub crop: Option<Crop>,
}

// Recognized operator patterns, tried in order per token. Mirrors the URL
// grammar: size:WxH, fit:NAME, grayscale, quality:N, bg:RRGGBB, trim:N,
// crop:N or crop:T,R,B,L.
static OPERATOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^size:([0-9]+)x([0-9]+)$").unwrap(),
        Regex::new(r"^fit:([a-z]+)$").unwrap(),
        Regex::new(r"^grayscale$").unwrap(),
        Regex::new(r"^quality:([0-9]+)$").unwrap(),
        Regex::new(r"^bg:([0-9a-f]{6})$").unwrap(),
        Regex::new(r"^trim:([0-9]+)$").unwrap(),
        Regex::new(r"^crop:([0-9]+(?:,[0-9]+,[0-9]+,[0-9]+)?)$").unwrap(),
    ]
});

impl ModifierSet {
    /// Parse a `_`-separated modifier blob (the segment between the base
    /// filename and the extension). Unknown tokens are dropped.
    pub fn parse_blob(blob: &str) -> Self {
        let mut set = ModifierSet::default();
        for token in blob.split('_').filter(|t| !t.is_empty()) {
            set.apply_token(token);
        }
        set
    }

    /// Parse a `|`-separated modifier spec, the convention accepted by URL
    /// generation (e.g. `"size:100x100|grayscale"`).
    pub fn from_spec(spec: &str) -> Self {
        let mut set = ModifierSet::default();
        for token in spec.split('|').filter(|t| !t.is_empty()) {
            set.apply_token(token);
        }
        set
    }

    /// Apply a single token. Returns whether the token was recognized.
    pub fn apply_token(&mut self, token: &str) -> bool {
        for (idx, pattern) in OPERATOR_PATTERNS.iter().enumerate() {
            let Some(caps) = pattern.captures(token) else {
                continue;
            };
            match idx {
                0 => {
                    // Both captures already matched [0-9]+; overflow is the
                    // only possible parse failure and drops the token.
                    let (Ok(w), Ok(h)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
                        return false;
                    };
                    self.size = Some((w, h));
                }
                1 => {
                    // A syntactically valid fit token with an unrecognized
                    // mode name is dropped like any unknown token.
                    let Some(fit) = FitMode::parse(&caps[1]) else {
                        return false;
                    };
                    self.fit = Some(fit);
                }
                2 => self.grayscale = true,
                3 => {
                    let Ok(q) = caps[1].parse::<u32>() else {
                        return false;
                    };
                    self.quality = Some(q.clamp(1, 100) as u8);
                }
                4 => self.bgcolor = Some(caps[1].to_string()),
                5 => {
                    let Ok(t) = caps[1].parse::<u32>() else {
                        return false;
                    };
                    self.trim = Some(t.clamp(1, 99) as u8);
                }
                6 => {
                    let parts: Vec<u32> = caps[1]
                        .split(',')
                        .map(|p| p.parse::<u32>())
                        .collect::<Result<_, _>>()
                        .unwrap_or_default();
                    match parts.as_slice() {
                        [n] => self.crop = Some(Crop::Uniform(*n)),
                        [t, r, b, l] => {
                            self.crop = Some(Crop::PerSide {
                                top: *t,
                                right: *r,
                                bottom: *b,
                                left: *l,
                            })
                        }
                        _ => return false,
                    }
                }
                _ => unreachable!(),
            }
            return true;
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        *self == ModifierSet::default()
    }

    /// Serialize to the canonical `_`-separated token string: tokens sorted
    /// alphabetically so equivalent sets always produce identical strings.
    /// Returns `None` for an empty set.
    pub fn to_token_string(&self) -> Option<String> {
        let mut tokens = Vec::new();
        if let Some(ref bg) = self.bgcolor {
            tokens.push(format!("bg:{}", bg));
        }
        match self.crop {
            Some(Crop::Uniform(n)) => tokens.push(format!("crop:{}", n)),
            Some(Crop::PerSide {
                top,
                right,
                bottom,
                left,
            }) => tokens.push(format!("crop:{},{},{},{}", top, right, bottom, left)),
            None => {}
        }
        if let Some(fit) = self.fit {
            tokens.push(format!("fit:{}", fit.as_str()));
        }
        if self.grayscale {
            tokens.push("grayscale".to_string());
        }
        if let Some(q) = self.quality {
            tokens.push(format!("quality:{}", q));
        }
        if let Some((w, h)) = self.size {
            tokens.push(format!("size:{}x{}", w, h));
        }
        if let Some(t) = self.trim {
            tokens.push(format!("trim:{}", t));
        }
        if tokens.is_empty() {
            return None;
        }
        tokens.sort();
        Some(tokens.join("_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_tokens() {
        let set = ModifierSet::parse_blob("size:100x200");
        assert_eq!(set.size, Some((100, 200)));

        let set = ModifierSet::parse_blob("fit:lpad");
        assert_eq!(set.fit, Some(FitMode::PadLimit));

        let set = ModifierSet::parse_blob("grayscale");
        assert!(set.grayscale);

        let set = ModifierSet::parse_blob("bg:ff00aa");
        assert_eq!(set.bgcolor.as_deref(), Some("ff00aa"));

        let set = ModifierSet::parse_blob("crop:10");
        assert_eq!(set.crop, Some(Crop::Uniform(10)));

        let set = ModifierSet::parse_blob("crop:10,20,30,40");
        assert_eq!(
            set.crop,
            Some(Crop::PerSide {
                top: 10,
                right: 20,
                bottom: 30,
                left: 40
            })
        );
    }

    #[test]
    fn test_parse_combined_blob() {
        let set = ModifierSet::parse_blob("size:320x240_fit:lim_grayscale_quality:90");
        assert_eq!(set.size, Some((320, 240)));
        assert_eq!(set.fit, Some(FitMode::Limit));
        assert!(set.grayscale);
        assert_eq!(set.quality, Some(90));
    }

    #[test]
    fn test_unknown_tokens_dropped() {
        let set = ModifierSet::parse_blob("size:10x10_blur:5_webp_v2");
        assert_eq!(set.size, Some((10, 10)));
        assert_eq!(
            set,
            ModifierSet {
                size: Some((10, 10)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_invalid_args_dropped() {
        // uppercase hex, wrong hex length, bad fit name, 2-part crop
        let set = ModifierSet::parse_blob("bg:FF00AA_bg:ff0_fit:cover_crop:1,2");
        assert!(set.is_empty());
    }

    #[test]
    fn test_duplicate_operator_last_wins() {
        let set = ModifierSet::parse_blob("size:10x10_size:20x20");
        assert_eq!(set.size, Some((20, 20)));
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(ModifierSet::parse_blob("quality:0").quality, Some(1));
        assert_eq!(ModifierSet::parse_blob("quality:150").quality, Some(100));
        assert_eq!(ModifierSet::parse_blob("quality:75").quality, Some(75));
    }

    #[test]
    fn test_trim_clamped() {
        assert_eq!(ModifierSet::parse_blob("trim:0").trim, Some(1));
        assert_eq!(ModifierSet::parse_blob("trim:250").trim, Some(99));
    }

    #[test]
    fn test_canonical_serialization_sorted() {
        let set = ModifierSet::parse_blob("trim:5_size:10x10_bg:cccccc_grayscale");
        assert_eq!(
            set.to_token_string().unwrap(),
            "bg:cccccc_grayscale_size:10x10_trim:5"
        );
    }

    #[test]
    fn test_round_trip() {
        let original = ModifierSet::parse_blob("size:640x480_fit:lpad_quality:80_crop:1,2,3,4");
        let serialized = original.to_token_string().unwrap();
        let reparsed = ModifierSet::parse_blob(&serialized);
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_from_spec_pipe_separated() {
        let set = ModifierSet::from_spec("size:100x100|grayscale");
        assert_eq!(set.size, Some((100, 100)));
        assert!(set.grayscale);
        // same canonical form as the underscore variant
        assert_eq!(
            set.to_token_string(),
            ModifierSet::parse_blob("grayscale_size:100x100").to_token_string()
        );
    }

    #[test]
    fn test_empty_set_serializes_to_none() {
        assert_eq!(ModifierSet::default().to_token_string(), None);
    }
}
