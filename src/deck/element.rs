use crate::deck::text::TextBody;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 寬高都是有限正數
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// 元素在頁面上的位置與旋轉（單位 pt，座標為頁面絕對座標）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// 順時針角度
    #[serde(default)]
    pub rotation: f64,
}

impl Transform {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    pub fn set_bounds(&mut self, rect: Rect) {
        self.left = rect.left;
        self.top = rect.top;
        self.width = rect.width;
        self.height = rect.height;
    }
}

/// 各邊裁掉的比例（0.0 ~ 1.0）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Crop {
    pub fn is_valid(&self) -> bool {
        let sides = [self.left, self.right, self.top, self.bottom];
        sides.iter().all(|s| s.is_finite() && (0.0..1.0).contains(s))
            && self.left + self.right < 1.0
            && self.top + self.bottom < 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub object_id: String,
    pub transform: Transform,
    /// `None` 代表此形狀不支援文字（線條、箭頭等）
    #[serde(default)]
    pub text: Option<TextBody>,
}

impl Shape {
    pub fn text_box(transform: Transform, text: TextBody) -> Self {
        Self {
            object_id: new_object_id(),
            transform,
            text: Some(text),
        }
    }

    pub fn text(&self) -> Option<&TextBody> {
        self.text.as_ref()
    }

    pub fn text_mut(&mut self) -> Option<&mut TextBody> {
        self.text.as_mut()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub object_id: String,
    pub transform: Transform,
    pub children: Vec<PageElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub object_id: String,
    pub transform: Transform,
    pub media_id: String,
    #[serde(default)]
    pub native_size: Option<Size>,
    #[serde(default)]
    pub crop: Option<Crop>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("crop {0:?} leaves no visible area")]
pub struct UnsupportedCrop(pub Crop);

impl Image {
    pub fn set_crop(&mut self, crop: Crop) -> std::result::Result<(), UnsupportedCrop> {
        if !crop.is_valid() {
            return Err(UnsupportedCrop(crop));
        }
        self.crop = Some(crop);
        Ok(())
    }
}

/// 表格、影片、線條等不處理的元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherElement {
    pub object_id: String,
    pub transform: Transform,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageElement {
    Shape(Shape),
    Group(Group),
    Image(Image),
    Other(OtherElement),
}

impl PageElement {
    pub fn object_id(&self) -> &str {
        match self {
            Self::Shape(s) => &s.object_id,
            Self::Group(g) => &g.object_id,
            Self::Image(i) => &i.object_id,
            Self::Other(o) => &o.object_id,
        }
    }

    /// 深層複製並給每個元素新的 ID
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.reassign_ids();
        copy
    }

    fn reassign_ids(&mut self) {
        match self {
            Self::Shape(s) => s.object_id = new_object_id(),
            Self::Image(i) => i.object_id = new_object_id(),
            Self::Other(o) => o.object_id = new_object_id(),
            Self::Group(g) => {
                g.object_id = new_object_id();
                for child in &mut g.children {
                    child.reassign_ids();
                }
            }
        }
    }

    pub fn find_shape(&self, id: &str) -> Option<&Shape> {
        match self {
            Self::Shape(s) if s.object_id == id => Some(s),
            Self::Group(g) => g.children.iter().find_map(|c| c.find_shape(id)),
            _ => None,
        }
    }

    pub fn find_shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        match self {
            Self::Shape(s) if s.object_id == id => Some(s),
            Self::Group(g) => g.children.iter_mut().find_map(|c| c.find_shape_mut(id)),
            _ => None,
        }
    }

    /// 對所有可編輯文字（含群組內）執行 `f`
    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut TextBody)) {
        match self {
            Self::Shape(s) => {
                if let Some(text) = s.text_mut() {
                    f(text);
                }
            }
            Self::Group(g) => {
                for child in &mut g.children {
                    child.for_each_text_mut(f);
                }
            }
            Self::Image(_) | Self::Other(_) => {}
        }
    }
}

pub fn new_object_id() -> String {
    format!("g{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped() -> PageElement {
        PageElement::Group(Group {
            object_id: "group".to_string(),
            transform: Transform::default(),
            children: vec![
                PageElement::Shape(Shape {
                    object_id: "inner".to_string(),
                    transform: Transform::default(),
                    text: Some(TextBody::plain("{{a}}")),
                }),
                PageElement::Other(OtherElement {
                    object_id: "line".to_string(),
                    transform: Transform::default(),
                    description: "line".to_string(),
                }),
            ],
        })
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids_recursively() {
        let original = grouped();
        let copy = original.duplicate();

        assert_ne!(copy.object_id(), "group");
        assert!(copy.find_shape("inner").is_none());
        let PageElement::Group(g) = &copy else {
            panic!("expected group");
        };
        assert_eq!(g.children.len(), 2);
        assert_ne!(g.children[0].object_id(), g.children[1].object_id());
    }

    #[test]
    fn test_find_shape_inside_group() {
        let mut element = grouped();
        assert!(element.find_shape("inner").is_some());
        assert!(element.find_shape("line").is_none());

        element
            .find_shape_mut("inner")
            .and_then(Shape::text_mut)
            .unwrap()
            .replace_all("{{a}}", "b");
        assert_eq!(
            element.find_shape("inner").unwrap().text().unwrap().plain_text(),
            "b"
        );
    }

    #[test]
    fn test_invalid_crop_is_rejected() {
        let mut image = Image {
            object_id: "img".to_string(),
            transform: Transform::default(),
            media_id: "m".to_string(),
            native_size: None,
            crop: None,
        };
        let too_much = Crop {
            left: 0.6,
            right: 0.6,
            ..Crop::default()
        };
        assert!(image.set_crop(too_much).is_err());
        assert!(image.crop.is_none());
        assert!(image.set_crop(Crop { top: 0.25, bottom: 0.25, ..Crop::default() }).is_ok());
    }
}
