use crate::deck::{Crop, Rect, Size};
use crate::domain::model::FitMode;

/// 圖片最終的位置大小，以及 COVER 需要的裁切
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitted {
    pub frame: Rect,
    pub crop: Option<Crop>,
}

/// 依縮放策略計算圖片在佔位框內的位置與大小。
///
/// 原始尺寸未知時 CONTAIN 與 COVER 都退回 STRETCH。旋轉不在這裡處理，
/// 呼叫端要在套用大小之後再設定。
pub fn fit(native: Option<Size>, frame: Rect, mode: FitMode) -> Fitted {
    let stretch = Fitted { frame, crop: None };
    let Some(native) = native.filter(Size::is_usable) else {
        return stretch;
    };

    match mode {
        FitMode::Stretch => stretch,
        FitMode::Contain => {
            let scale = (frame.width / native.width).min(frame.height / native.height);
            let width = native.width * scale;
            let height = native.height * scale;
            Fitted {
                frame: Rect::new(
                    frame.left + (frame.width - width) / 2.0,
                    frame.top + (frame.height - height) / 2.0,
                    width,
                    height,
                ),
                crop: None,
            }
        }
        FitMode::Cover => Fitted {
            frame,
            crop: cover_crop(native, frame.size()),
        },
    }
}

/// 填滿框所需的裁切比例，兩邊平均裁掉
pub fn cover_crop(native: Size, frame: Size) -> Option<Crop> {
    if !native.is_usable() || !frame.is_usable() {
        return None;
    }
    let image_ratio = native.width / native.height;
    let frame_ratio = frame.width / frame.height;

    if image_ratio > frame_ratio {
        let side = (1.0 - frame_ratio / image_ratio) / 2.0;
        Some(Crop {
            left: side,
            right: side,
            ..Crop::default()
        })
    } else {
        let side = (1.0 - image_ratio / frame_ratio) / 2.0;
        Some(Crop {
            top: side,
            bottom: side,
            ..Crop::default()
        })
    }
}
