use crate::core::color::Rgb;

/// Shared flat materials. Every text mesh in the scene uses one of these,
/// so animating a material recolors or fades every mesh that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Section titles and decorative text.
    Text,
    /// Item captions and the "SEE MORE" label.
    Caption,
    /// Underline below the item link and the contact link.
    LinkUnderline,
    /// Outlined text (intro/end lettering).
    Outline,
    /// Contact panel text.
    Contact,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Text,
        MaterialKind::Caption,
        MaterialKind::LinkUnderline,
        MaterialKind::Outline,
        MaterialKind::Contact,
    ];
}

/// Color, opacity and visibility of a flat material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMaterial {
    pub color: Rgb,
    pub opacity: f32,
    pub visible: bool,
}

impl TextMaterial {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
            visible: true,
        }
    }

    /// Starts transparent and hidden.
    pub fn hidden(color: Rgb) -> Self {
        Self {
            color,
            opacity: 0.0,
            visible: false,
        }
    }

    /// Opacity the renderer should use (0 when hidden).
    pub fn effective_opacity(&self) -> f32 {
        if self.visible {
            self.opacity
        } else {
            0.0
        }
    }
}

/// The full material set of a timeline scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Materials {
    pub text: TextMaterial,
    pub caption: TextMaterial,
    pub link_underline: TextMaterial,
    pub outline: TextMaterial,
    pub contact: TextMaterial,
}

impl Materials {
    /// Initial set: text and outline visible in `text_color`, caption and
    /// underline hidden, contact text white.
    pub fn new(text_color: Rgb, outline_color: Rgb) -> Self {
        Self {
            text: TextMaterial::new(text_color),
            caption: TextMaterial::hidden(text_color),
            link_underline: TextMaterial::hidden(text_color),
            outline: TextMaterial::new(outline_color),
            contact: TextMaterial::new(Rgb::WHITE),
        }
    }

    pub fn get(&self, kind: MaterialKind) -> &TextMaterial {
        match kind {
            MaterialKind::Text => &self.text,
            MaterialKind::Caption => &self.caption,
            MaterialKind::LinkUnderline => &self.link_underline,
            MaterialKind::Outline => &self.outline,
            MaterialKind::Contact => &self.contact,
        }
    }

    pub fn get_mut(&mut self, kind: MaterialKind) -> &mut TextMaterial {
        match kind {
            MaterialKind::Text => &mut self.text,
            MaterialKind::Caption => &mut self.caption,
            MaterialKind::LinkUnderline => &mut self.link_underline,
            MaterialKind::Outline => &mut self.outline,
            MaterialKind::Contact => &mut self.contact,
        }
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new(Rgb::from_hex(0x1b42d8), Rgb::from_hex(0x1b42d8))
    }
}
