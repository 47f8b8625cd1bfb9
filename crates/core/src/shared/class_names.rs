use std::collections::BTreeMap;

use thiserror::Error;

/// The 80 COCO categories YOLOv8 checkpoints are trained on, in id order.
pub const COCO_CLASS_NAMES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

#[derive(Error, Debug, PartialEq)]
pub enum ClassNameError {
    #[error("class name table must be enclosed in braces")]
    MissingBraces,
    #[error("invalid class id at byte {0}")]
    InvalidId(usize),
    #[error("expected quoted class name at byte {0}")]
    ExpectedName(usize),
    #[error("unterminated class name starting at byte {0}")]
    Unterminated(usize),
    #[error("class name table is empty")]
    Empty,
}

/// Read-only mapping from class id to human-readable label.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassNameTable {
    names: BTreeMap<u32, String>,
}

impl ClassNameTable {
    pub fn new(names: BTreeMap<u32, String>) -> Self {
        Self { names }
    }

    pub fn coco() -> Self {
        Self::new(
            COCO_CLASS_NAMES
                .iter()
                .enumerate()
                .map(|(id, name)| (id as u32, (*name).to_string()))
                .collect(),
        )
    }

    /// Parse the `names` entry an Ultralytics export writes into the model
    /// metadata, e.g. `{0: 'person', 1: 'bicycle'}`.
    pub fn parse_metadata(raw: &str) -> Result<Self, ClassNameError> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or(ClassNameError::MissingBraces)?;
        // Offsets in errors are relative to the trimmed input.
        let base = 1;
        let bytes = body.as_bytes();
        let mut names = BTreeMap::new();
        let mut pos = 0;

        loop {
            while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b',') {
                pos += 1;
            }
            if pos >= bytes.len() {
                break;
            }

            let id_start = pos;
            while pos < bytes.len() && bytes[pos] != b':' {
                pos += 1;
            }
            let id: u32 = body[id_start..pos]
                .trim()
                .parse()
                .map_err(|_| ClassNameError::InvalidId(base + id_start))?;
            pos += 1;

            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let quote = match bytes.get(pos) {
                Some(&q) if q == b'\'' || q == b'"' => q,
                _ => return Err(ClassNameError::ExpectedName(base + pos)),
            };
            let name_start = pos + 1;
            let name_len = body[name_start..]
                .bytes()
                .position(|b| b == quote)
                .ok_or(ClassNameError::Unterminated(base + pos))?;
            names.insert(id, body[name_start..name_start + name_len].to_string());
            pos = name_start + name_len + 1;
        }

        if names.is_empty() {
            return Err(ClassNameError::Empty);
        }
        Ok(Self::new(names))
    }

    pub fn get(&self, class_id: u32) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    /// Label for `class_id`, falling back to `class <id>` for unknown ids.
    pub fn name_or_id(&self, class_id: u32) -> String {
        self.get(class_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class {class_id}"))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
