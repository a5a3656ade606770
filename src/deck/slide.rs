use crate::deck::element::{new_object_id, Image, PageElement, Shape, Size, Transform};
use crate::deck::text::TextBody;
use serde::{Deserialize, Serialize};

/// 投影片回報元素清單時使用的順序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOrder {
    #[default]
    BackToFront,
    FrontToBack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub object_id: String,
    #[serde(default)]
    pub stack_order: StackOrder,
    /// 繪製順序：第一個在最底層
    #[serde(default)]
    elements: Vec<PageElement>,
}

impl Slide {
    pub fn new(elements: Vec<PageElement>) -> Self {
        Self {
            object_id: new_object_id(),
            stack_order: StackOrder::default(),
            elements,
        }
    }

    pub fn with_stack_order(mut self, stack_order: StackOrder) -> Self {
        self.stack_order = stack_order;
        self
    }

    /// 最上層元素，依 `stack_order` 排列
    pub fn page_elements(&self) -> Vec<&PageElement> {
        match self.stack_order {
            StackOrder::BackToFront => self.elements.iter().collect(),
            StackOrder::FrontToBack => self.elements.iter().rev().collect(),
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            object_id: new_object_id(),
            stack_order: self.stack_order,
            elements: self.elements.iter().map(PageElement::duplicate).collect(),
        }
    }

    pub fn find_shape(&self, id: &str) -> Option<&Shape> {
        self.elements.iter().find_map(|e| e.find_shape(id))
    }

    pub fn find_shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.elements.iter_mut().find_map(|e| e.find_shape_mut(id))
    }

    pub fn image_mut(&mut self, id: &str) -> Option<&mut Image> {
        self.elements.iter_mut().find_map(|e| match e {
            PageElement::Image(image) if image.object_id == id => Some(image),
            _ => None,
        })
    }

    pub fn for_each_text_mut(&mut self, mut f: impl FnMut(&mut TextBody)) {
        for element in &mut self.elements {
            element.for_each_text_mut(&mut f);
        }
    }

    /// 插入圖片，新圖片位於最上層。回傳新元素的 ID。
    pub fn insert_image(&mut self, media_id: &str, native_size: Option<Size>) -> String {
        let size = native_size.unwrap_or(Size::new(100.0, 100.0));
        let image = Image {
            object_id: new_object_id(),
            transform: Transform {
                width: size.width,
                height: size.height,
                ..Transform::default()
            },
            media_id: media_id.to_string(),
            native_size,
            crop: None,
        };
        let id = image.object_id.clone();
        self.elements.push(PageElement::Image(image));
        id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn paint_index(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.object_id() == id)
    }

    /// 元素在 `page_elements()` 中的位置；群組內的元素不在清單中
    pub fn position(&self, id: &str) -> Option<usize> {
        let paint = self.paint_index(id)?;
        Some(match self.stack_order {
            StackOrder::BackToFront => paint,
            StackOrder::FrontToBack => self.elements.len() - 1 - paint,
        })
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let Some(i) = self.paint_index(id) else {
            return false;
        };
        let element = self.elements.remove(i);
        self.elements.push(element);
        true
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        let Some(i) = self.paint_index(id) else {
            return false;
        };
        let element = self.elements.remove(i);
        self.elements.insert(0, element);
        true
    }

    pub fn send_backward(&mut self, id: &str) -> bool {
        match self.paint_index(id) {
            Some(0) => true,
            Some(i) => {
                self.elements.swap(i, i - 1);
                true
            }
            None => false,
        }
    }
}
