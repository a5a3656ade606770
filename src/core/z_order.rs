use crate::deck::{Slide, StackOrder};
use thiserror::Error;

/// 預設的額外步數。只是避免無限迴圈的保險，不保證一定能到達目標位置。
pub const DEFAULT_STEP_MARGIN: usize = 5;

/// 不中斷流程的圖層警告，呼叫端記錄後繼續
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementWarning {
    #[error("element '{0}' is not in the page element list")]
    ElementNotFound(String),

    #[error("anchor '{0}' is not in the page element list")]
    AnchorNotFound(String),

    #[error("gave up after {steps} steps moving '{element}' behind '{anchor}'")]
    StepLimitReached {
        element: String,
        anchor: String,
        steps: usize,
    },
}

/// 只提供「移到最前 / 最後 / 往後一層」的元素清單，
/// 清單方向（前到後或後到前）未知。
pub trait LayerStack {
    fn len(&self) -> usize;
    fn position(&self, id: &str) -> Option<usize>;
    fn bring_to_front(&mut self, id: &str) -> bool;
    fn send_to_back(&mut self, id: &str) -> bool;
    fn send_backward(&mut self, id: &str) -> bool;
}

impl LayerStack for Slide {
    fn len(&self) -> usize {
        Slide::len(self)
    }

    fn position(&self, id: &str) -> Option<usize> {
        Slide::position(self, id)
    }

    fn bring_to_front(&mut self, id: &str) -> bool {
        Slide::bring_to_front(self, id)
    }

    fn send_to_back(&mut self, id: &str) -> bool {
        Slide::send_to_back(self, id)
    }

    fn send_backward(&mut self, id: &str) -> bool {
        Slide::send_backward(self, id)
    }
}

/// 實際移動一次元素來推斷清單方向，結束時該元素位於最前面
pub fn infer_stack_order<L: LayerStack + ?Sized>(
    stack: &mut L,
    probe_id: &str,
) -> Result<StackOrder, PlacementWarning> {
    let not_found = || PlacementWarning::ElementNotFound(probe_id.to_string());

    if !stack.bring_to_front(probe_id) {
        return Err(not_found());
    }
    let front = stack.position(probe_id).ok_or_else(not_found)?;
    stack.send_to_back(probe_id);
    let back = stack.position(probe_id).ok_or_else(not_found)?;
    stack.bring_to_front(probe_id);

    Ok(if front > back {
        StackOrder::BackToFront
    } else {
        StackOrder::FrontToBack
    })
}

/// 把 `element_id` 放到 `anchor_id` 的正後方。
///
/// 失敗時元素留在原本插入的位置（最前面），不影響其他處理。
pub fn place_behind<L: LayerStack + ?Sized>(
    stack: &mut L,
    element_id: &str,
    anchor_id: &str,
    step_margin: usize,
) -> Result<(), PlacementWarning> {
    if stack.position(anchor_id).is_none() {
        return Err(PlacementWarning::AnchorNotFound(anchor_id.to_string()));
    }

    // 推斷方向後元素已在最前面
    let order = infer_stack_order(stack, element_id)?;
    let max_steps = stack.len() + step_margin;
    let last = stack.len().saturating_sub(1);

    for _ in 0..=max_steps {
        let current = stack
            .position(element_id)
            .ok_or_else(|| PlacementWarning::ElementNotFound(element_id.to_string()))?;
        let anchor = stack
            .position(anchor_id)
            .ok_or_else(|| PlacementWarning::AnchorNotFound(anchor_id.to_string()))?;

        let desired = match order {
            StackOrder::BackToFront => anchor.saturating_sub(1),
            StackOrder::FrontToBack => (anchor + 1).min(last),
        };
        if current == desired {
            return Ok(());
        }
        if !stack.send_backward(element_id) {
            return Err(PlacementWarning::ElementNotFound(element_id.to_string()));
        }
    }

    Err(PlacementWarning::StepLimitReached {
        element: element_id.to_string(),
        anchor: anchor_id.to_string(),
        steps: max_steps,
    })
}
