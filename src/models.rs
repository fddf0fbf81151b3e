use std::sync::Arc;

/// The six visual parameters sent to the processing endpoint.
///
/// Values are kept as the strings the user sees; the endpoint owns their
/// interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    pub ratio: String,
    pub depth: String,
    pub shape: String,
    pub bg_color: String, // "" means no background override
    pub stroke_color: String,
    pub stroke_width: String,
}

impl ParameterSet {
    pub fn new(
        ratio: &str,
        depth: &str,
        shape: &str,
        bg_color: &str,
        stroke_color: &str,
        stroke_width: &str,
    ) -> Self {
        Self {
            ratio: ratio.to_string(),
            depth: depth.to_string(),
            shape: shape.to_string(),
            bg_color: bg_color.to_string(),
            stroke_color: stroke_color.to_string(),
            stroke_width: stroke_width.to_string(),
        }
    }

    pub fn get(&self, field: ParameterField) -> &str {
        match field {
            ParameterField::Ratio => &self.ratio,
            ParameterField::Depth => &self.depth,
            ParameterField::Shape => &self.shape,
            ParameterField::BgColor => &self.bg_color,
            ParameterField::StrokeColor => &self.stroke_color,
            ParameterField::StrokeWidth => &self.stroke_width,
        }
    }

    /// Field name/value pairs in wire order.
    pub fn parts(&self) -> [(&'static str, &str); 6] {
        ParameterField::ALL.map(|field| (field.wire_name(), self.get(field)))
    }
}

// Matches the processing engine's own command line defaults
impl Default for ParameterSet {
    fn default() -> Self {
        Self::new("1:1", "8", "rect", "white", "black", "0")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Ratio,
    Depth,
    Shape,
    BgColor,
    StrokeColor,
    StrokeWidth,
}

impl ParameterField {
    pub const ALL: [ParameterField; 6] = [
        ParameterField::Ratio,
        ParameterField::Depth,
        ParameterField::Shape,
        ParameterField::BgColor,
        ParameterField::StrokeColor,
        ParameterField::StrokeWidth,
    ];

    /// Multipart part name expected by `/run`.
    pub fn wire_name(self) -> &'static str {
        match self {
            ParameterField::Ratio => "ratio",
            ParameterField::Depth => "depth",
            ParameterField::Shape => "shape",
            ParameterField::BgColor => "bg_color",
            ParameterField::StrokeColor => "stroke_color",
            ParameterField::StrokeWidth => "stroke_width",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParameterField::Ratio => "Aspect ratio",
            ParameterField::Depth => "Depth",
            ParameterField::Shape => "Shape",
            ParameterField::BgColor => "Background color",
            ParameterField::StrokeColor => "Stroke color",
            ParameterField::StrokeWidth => "Stroke width",
        }
    }
}

/// A named, fixed bundle of parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub parameters: ParameterSet,
}

/// An image held in memory, ready to preview and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Live form contents: the parameters plus the chosen image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub parameters: ParameterSet,
    pub image: Option<ImageFile>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: ParameterField, value: String) {
        let slot = match field {
            ParameterField::Ratio => &mut self.parameters.ratio,
            ParameterField::Depth => &mut self.parameters.depth,
            ParameterField::Shape => &mut self.parameters.shape,
            ParameterField::BgColor => &mut self.parameters.bg_color,
            ParameterField::StrokeColor => &mut self.parameters.stroke_color,
            ParameterField::StrokeWidth => &mut self.parameters.stroke_width,
        };
        *slot = value;
    }
}

/// Outcome reported by the processing endpoint for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Processed { output_url: String },
    Rejected { message: String },
}

/// What the result area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Submitting,
    /// `output_url` already carries the cache-defeating token.
    Success { output_url: String },
    Error { message: String },
}

/// Style selector entry; `Custom` is the "no preset" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleChoice {
    #[default]
    Custom,
    Preset(&'static str),
}

impl StyleChoice {
    pub fn key(&self) -> &'static str {
        match self {
            StyleChoice::Custom => "",
            StyleChoice::Preset(key) => *key,
        }
    }
}

// Implement Display trait so pick_list can show the choice
impl std::fmt::Display for StyleChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleChoice::Custom => write!(f, "Custom"),
            StyleChoice::Preset(key) => write!(f, "{}", key),
        }
    }
}
