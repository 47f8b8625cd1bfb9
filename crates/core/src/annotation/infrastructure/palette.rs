/// Fixed set of box colors, picked per class id.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    colors: Vec<[u8; 3]>,
}

const DEFAULT_COLORS: [[u8; 3]; 16] = [
    [0xe6, 0x19, 0x4b],
    [0x3c, 0xb4, 0x4b],
    [0xff, 0xe1, 0x19],
    [0x00, 0x82, 0xc8],
    [0xf5, 0x82, 0x31],
    [0x91, 0x1e, 0xb4],
    [0x46, 0xf0, 0xf0],
    [0xf0, 0x32, 0xe6],
    [0xd2, 0xf5, 0x3c],
    [0xfa, 0xbe, 0xbe],
    [0x00, 0x80, 0x80],
    [0xe6, 0xbe, 0xff],
    [0xaa, 0x6e, 0x28],
    [0xff, 0xfa, 0xc8],
    [0x80, 0x00, 0x00],
    [0xaa, 0xff, 0xc3],
];

impl ColorPalette {
    pub fn by_class(&self, class_id: u32) -> [u8; 3] {
        self.colors[class_id as usize % self.colors.len()]
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}
