use crate::deck::{PageElement, Slide};
use crate::domain::model::PlaceholderMatch;

/// 找出投影片上所有含有 `token` 的文字形狀（包含群組內的形狀）。
///
/// 每個匹配都附上最外層元素的 ID，之後插入的圖片會放在它的正後方。
pub fn find_placeholders(slide: &Slide, token: &str) -> Vec<PlaceholderMatch> {
    let mut matches = Vec::new();
    if token.is_empty() {
        return matches;
    }
    for element in slide.page_elements() {
        collect(element, element.object_id(), token, &mut matches);
    }
    matches
}

fn collect(element: &PageElement, anchor_id: &str, token: &str, out: &mut Vec<PlaceholderMatch>) {
    match element {
        PageElement::Group(group) => {
            for child in &group.children {
                collect(child, anchor_id, token, out);
            }
        }
        PageElement::Shape(shape) => {
            // 不支援文字的形狀直接略過
            let Some(text) = shape.text() else {
                return;
            };
            if text.contains(token) {
                out.push(PlaceholderMatch {
                    element_id: shape.object_id.clone(),
                    anchor_id: anchor_id.to_string(),
                });
            }
        }
        PageElement::Image(_) | PageElement::Other(_) => {}
    }
}
