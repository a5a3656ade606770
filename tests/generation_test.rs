use httpmock::prelude::*;
use serde_json::{json, Value};
use sheet_slides::core::DeckStore;
use sheet_slides::deck::{
    Group, OtherElement, PageElement, Presentation, Shape, Size, Slide, StackOrder, TextBody,
    TextRun, TextStyle, Transform, ZERO_WIDTH_SPACE,
};
use sheet_slides::{
    Dataset, DeckError, FitMode, GenerationConfig, ImageFieldConfig, ImageResolver, ImageSource,
    LocalStorage, SlideGenerator,
};
use std::io::Cursor;
use tempfile::TempDir;

const TEMPLATE_ID: &str = "templates/team";

fn frame(left: f64, top: f64, width: f64, height: f64, rotation: f64) -> Transform {
    Transform {
        left,
        top,
        width,
        height,
        rotation,
    }
}

fn text_shape(id: &str, text: TextBody, transform: Transform) -> PageElement {
    PageElement::Shape(Shape {
        object_id: id.to_string(),
        transform,
        text: Some(text),
    })
}

fn other(id: &str) -> PageElement {
    PageElement::Other(OtherElement {
        object_id: id.to_string(),
        transform: frame(0.0, 0.0, 720.0, 405.0, 0.0),
        description: "background".to_string(),
    })
}

/// 背景、含圖片佔位的群組、標題
fn person_slide() -> Slide {
    let card = PageElement::Group(Group {
        object_id: "card".to_string(),
        transform: frame(80.0, 40.0, 260.0, 140.0, 0.0),
        children: vec![
            other("card-border"),
            text_shape(
                "photo-box",
                TextBody::plain("{{photo}}"),
                frame(100.0, 50.0, 200.0, 100.0, 15.0),
            ),
        ],
    });
    let title = text_shape(
        "title",
        TextBody::new(vec![
            TextRun::new(
                "Hello ",
                TextStyle {
                    bold: true,
                    ..TextStyle::default()
                },
            ),
            TextRun::plain("{{firstName}} from {{city}}"),
        ]),
        frame(20.0, 300.0, 600.0, 60.0, 0.0),
    );
    Slide::new(vec![other("bg"), card, title])
}

fn intro_slide() -> Slide {
    Slide::new(vec![text_shape(
        "intro",
        TextBody::plain("Team overview"),
        frame(0.0, 0.0, 100.0, 20.0, 0.0),
    )])
}

async fn setup(person: Slide) -> (TempDir, LocalStorage) {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("output")).unwrap();
    std::fs::create_dir_all(temp_dir.path().join("blobs")).unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let mut template = Presentation::new(TEMPLATE_ID, "Team template");
    template.slides = vec![intro_slide(), person, intro_slide()];
    storage.save(&template).await.unwrap();

    (temp_dir, storage)
}

fn config(image_fields: Vec<ImageFieldConfig>) -> GenerationConfig {
    GenerationConfig {
        template_id: TEMPLATE_ID.to_string(),
        output_folder_id: "output".to_string(),
        file_name_pattern: "Team {{date}}".to_string(),
        start_row: 2,
        template_slide_index: 2,
        image_fields,
    }
}

fn photo_field(source: ImageSource, fit: FitMode) -> ImageFieldConfig {
    ImageFieldConfig {
        index: 1,
        field: "photo".to_string(),
        source,
        fit,
    }
}

fn dataset(rows: Vec<Vec<Value>>) -> Dataset {
    let headers = vec!["firstName".to_string(), "city".to_string(), "photo".to_string()];
    Dataset::new(headers, rows).unwrap()
}

fn generator(storage: &LocalStorage) -> SlideGenerator<LocalStorage, LocalStorage> {
    SlideGenerator::new(storage.clone(), ImageResolver::new(storage.clone()))
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn collect_texts(element: &PageElement, out: &mut Vec<String>) {
    match element {
        PageElement::Shape(shape) => {
            if let Some(text) = shape.text() {
                out.push(text.plain_text());
            }
        }
        PageElement::Group(group) => {
            for child in &group.children {
                collect_texts(child, out);
            }
        }
        _ => {}
    }
}

fn texts(slide: &Slide) -> Vec<String> {
    let mut out = Vec::new();
    for element in slide.page_elements() {
        collect_texts(element, &mut out);
    }
    out
}

fn title_text(slide: &Slide) -> String {
    texts(slide).pop().unwrap()
}

/// 最上層元素的種類，由後到前
fn paint_kinds(slide: &Slide) -> Vec<&'static str> {
    let mut kinds: Vec<&'static str> = slide
        .page_elements()
        .iter()
        .map(|e| match e {
            PageElement::Shape(_) => "shape",
            PageElement::Group(_) => "group",
            PageElement::Image(_) => "image",
            PageElement::Other(_) => "other",
        })
        .collect();
    if slide.stack_order == StackOrder::FrontToBack {
        kinds.reverse();
    }
    kinds
}

fn images(slide: &Slide) -> Vec<&sheet_slides::deck::Image> {
    slide
        .page_elements()
        .into_iter()
        .filter_map(|e| match e {
            PageElement::Image(image) => Some(image),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_text_placeholders_and_row_order() {
    let (_temp_dir, storage) = setup(person_slide()).await;
    let data = dataset(vec![
        vec![json!("Alice"), json!("Paris"), json!("")],
        vec![json!("Bob"), json!("Rome"), json!("")],
        vec![json!("Chloé"), json!(42), json!("")],
    ]);

    let result = generator(&storage).generate(&data, &config(vec![])).await.unwrap();

    assert_eq!(result.slides_generated, 3);
    assert!(result.file_id.starts_with("output/"));
    assert!(result.file_name.starts_with("Team "));

    let deck = storage.open(&result.file_id).await.unwrap();
    assert_eq!(deck.name, result.file_name);
    assert_eq!(deck.slide_count(), 3);
    let titles: Vec<String> = deck.slides.iter().map(title_text).collect();
    assert_eq!(
        titles,
        vec!["Hello Alice from Paris", "Hello Bob from Rome", "Hello Chloé from 42"]
    );

    // 樣式保留
    let elements = deck.slides[0].page_elements();
    let PageElement::Shape(title) = elements[2] else {
        panic!("expected title shape");
    };
    let runs = &title.text().unwrap().runs;
    assert_eq!(runs[0].content, "Hello ");
    assert!(runs[0].style.bold);

    // 沒有設定成圖片欄位的 photo 以文字取代
    assert_eq!(texts(&deck.slides[0])[0], "");
}

#[tokio::test]
async fn test_values_containing_tokens_fill_in_header_order() {
    let (_temp_dir, storage) = setup(person_slide()).await;
    let data = dataset(vec![vec![json!("{{city}}"), json!("Paris"), json!("")]]);

    for _ in 0..5 {
        let result = generator(&storage).generate(&data, &config(vec![])).await.unwrap();
        let deck = storage.open(&result.file_id).await.unwrap();
        assert_eq!(title_text(&deck.slides[0]), "Hello Paris from Paris");
    }
}

#[tokio::test]
async fn test_empty_rows_are_skipped_and_blueprint_removed() {
    let (_temp_dir, storage) = setup(person_slide()).await;
    let data = dataset(vec![
        vec![json!("Alice"), json!("Paris"), json!("")],
        vec![json!(""), json!("  "), Value::Null],
    ]);

    let result = generator(&storage).generate(&data, &config(vec![])).await.unwrap();
    assert_eq!(result.slides_generated, 1);

    let deck = storage.open(&result.file_id).await.unwrap();
    assert_eq!(deck.slide_count(), 1);
    assert!(deck.slides.iter().all(|s| !texts(s).iter().any(|t| t.contains("{{"))));
    assert!(deck.slides.iter().all(|s| !texts(s).contains(&"Team overview".to_string())));
}

#[tokio::test]
async fn test_blueprint_index_out_of_range_creates_nothing() {
    let (temp_dir, storage) = setup(person_slide()).await;
    let mut cfg = config(vec![]);
    cfg.template_slide_index = 4;

    let err = generator(&storage)
        .generate(&dataset(vec![vec![json!("A"), json!("B"), json!("")]]), &cfg)
        .await
        .unwrap_err();

    assert!(matches!(err, DeckError::ConfigError { .. }));
    let outputs = std::fs::read_dir(temp_dir.path().join("output")).unwrap().count();
    assert_eq!(outputs, 0);
}

#[tokio::test]
async fn test_url_image_contain_behind_group() {
    let (_temp_dir, storage) = setup(person_slide()).await;
    let server = MockServer::start();
    let image_mock = server.mock(|when, then| {
        when.method(GET).path("/alice.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(png(400, 400));
    });

    let data = dataset(vec![vec![
        json!("Alice"),
        json!("Paris"),
        json!(server.url("/alice.png")),
    ]]);
    let cfg = config(vec![photo_field(ImageSource::Url, FitMode::Contain)]);

    let result = generator(&storage).generate(&data, &cfg).await.unwrap();
    image_mock.assert();

    let deck = storage.open(&result.file_id).await.unwrap();
    let slide = &deck.slides[0];

    assert_eq!(paint_kinds(slide), vec!["other", "image", "group", "shape"]);
    let image = images(slide)[0];
    assert_eq!(image.transform, frame(150.0, 50.0, 100.0, 100.0, 15.0));
    assert!(image.crop.is_none());
    assert_eq!(
        deck.media[&image.media_id].content_type.as_deref(),
        Some("image/png")
    );
    assert!(!deck.media[&image.media_id].bytes.is_empty());

    // 佔位文字移除後只剩零寬空白
    assert_eq!(texts(slide)[0], ZERO_WIDTH_SPACE.to_string());
    assert_eq!(title_text(slide), "Hello Alice from Paris");
}

#[tokio::test]
async fn test_reference_image_cover_on_front_to_back_slide() {
    let (temp_dir, storage) =
        setup(person_slide().with_stack_order(StackOrder::FrontToBack)).await;
    std::fs::write(
        temp_dir.path().join("blobs/ABCDEFGHIJ1234567890.png"),
        png(300, 300),
    )
    .unwrap();

    let data = dataset(vec![vec![
        json!("Alice"),
        json!("Paris"),
        json!("https://drive.example.com/file/d/ABCDEFGHIJ1234567890/view"),
    ]]);
    let cfg = config(vec![photo_field(ImageSource::ReferenceId, FitMode::Cover)]);

    let result = generator(&storage).generate(&data, &cfg).await.unwrap();
    let deck = storage.open(&result.file_id).await.unwrap();
    let slide = &deck.slides[0];

    assert_eq!(paint_kinds(slide), vec!["other", "image", "group", "shape"]);
    let image = images(slide)[0];
    assert_eq!(image.transform, frame(100.0, 50.0, 200.0, 100.0, 15.0));
    let crop = image.crop.unwrap();
    assert!((crop.top - 0.25).abs() < 1e-9);
    assert!((crop.bottom - 0.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_empty_image_value_only_strips_token() {
    let style = TextStyle {
        italic: true,
        font_size: Some(24.0),
        ..TextStyle::default()
    };
    let slide = Slide::new(vec![text_shape(
        "caption",
        TextBody::new(vec![TextRun::new("Photo: {{photo}}", style.clone())]),
        frame(0.0, 0.0, 100.0, 100.0, 0.0),
    )]);
    let (_temp_dir, storage) = setup(slide).await;

    let data = dataset(vec![vec![json!("Alice"), json!("Paris"), json!("  ")]]);
    let cfg = config(vec![photo_field(ImageSource::Url, FitMode::Stretch)]);

    let result = generator(&storage).generate(&data, &cfg).await.unwrap();
    let deck = storage.open(&result.file_id).await.unwrap();
    let slide = &deck.slides[0];

    assert!(images(slide).is_empty());
    assert!(deck.media.is_empty());
    let elements = slide.page_elements();
    let PageElement::Shape(caption) = elements[0] else {
        panic!("expected caption shape");
    };
    let text = caption.text().unwrap();
    assert_eq!(text.plain_text(), "Photo: ");
    assert_eq!(text.runs[0].style, style);
}

#[tokio::test]
async fn test_failed_image_fetch_aborts_but_saves_deck() {
    let (temp_dir, storage) = setup(person_slide()).await;
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/gone.png");
        then.status(404);
    });

    let data = dataset(vec![
        vec![json!("Alice"), json!("Paris"), json!(server.url("/gone.png"))],
        vec![json!("Bob"), json!("Rome"), json!(server.url("/gone.png"))],
    ]);
    let cfg = config(vec![photo_field(ImageSource::Url, FitMode::Contain)]);

    let err = generator(&storage).generate(&data, &cfg).await.unwrap_err();
    missing.assert_hits(1);
    assert!(matches!(
        err,
        DeckError::HttpStatusError { ref field, status: 404 } if field == "photo"
    ));

    // 副本仍然存檔一次，藍圖已移除，失敗的列沒有留下投影片
    let decks: Vec<String> = std::fs::read_dir(temp_dir.path().join("output"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(decks.len(), 1);
    let stem = decks[0].strip_suffix(".deck").expect("deck archive");

    let deck = storage.open(&format!("output/{}", stem)).await.unwrap();
    assert_eq!(deck.slide_count(), 0);
    assert!(deck.media.is_empty());
}

#[tokio::test]
async fn test_missing_reference_is_fetch_error() {
    let (_temp_dir, storage) = setup(person_slide()).await;
    let data = dataset(vec![vec![json!("Alice"), json!("Paris"), json!("no-such-file")]]);
    let cfg = config(vec![photo_field(ImageSource::ReferenceId, FitMode::Contain)]);

    let err = generator(&storage).generate(&data, &cfg).await.unwrap_err();
    assert!(matches!(err, DeckError::FetchError { .. }));
}

#[tokio::test]
async fn test_image_field_without_placeholder_is_ignored() {
    let (_temp_dir, storage) = setup(intro_slide()).await;
    let data = dataset(vec![vec![json!("Alice"), json!("Paris"), json!("https://unused.example/a.png")]]);
    let cfg = config(vec![photo_field(ImageSource::Url, FitMode::Contain)]);

    let result = generator(&storage).generate(&data, &cfg).await.unwrap();
    let deck = storage.open(&result.file_id).await.unwrap();
    assert_eq!(deck.slide_count(), 1);
    assert!(images(&deck.slides[0]).is_empty());
}

/// 兩個圖片佔位與一個標題
fn gallery_slide() -> Slide {
    Slide::new(vec![
        other("bg"),
        text_shape("photo-box", TextBody::plain("{{photo}}"), frame(0.0, 0.0, 100.0, 100.0, 0.0)),
        text_shape("logo-box", TextBody::plain("{{logo}}"), frame(200.0, 0.0, 50.0, 50.0, 0.0)),
        text_shape("name", TextBody::plain("{{firstName}}"), frame(0.0, 300.0, 300.0, 40.0, 0.0)),
    ])
}

#[tokio::test]
async fn test_two_image_fields_in_declaration_order() {
    let (temp_dir, storage) = setup(gallery_slide()).await;
    std::fs::write(temp_dir.path().join("blobs/LOGO_1.png"), png(20, 10)).unwrap();

    let server = MockServer::start();
    let photo_mock = server.mock(|when, then| {
        when.method(GET).path("/alice.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(png(200, 100));
    });

    let headers = ["firstName", "photo", "logo", "badge"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let data = Dataset::new(
        headers,
        vec![
            vec![
                json!("Alice"),
                json!(server.url("/alice.png")),
                json!("https://drive.example.com/open?id=LOGO_1"),
                json!("https://unused.example/badge.png"),
            ],
            vec![
                json!("Bob"),
                json!(""),
                json!("https://drive.example.com/uc?export=view&id=LOGO_1"),
                json!(""),
            ],
        ],
    )
    .unwrap();

    let cfg = config(vec![
        photo_field(ImageSource::Url, FitMode::Contain),
        ImageFieldConfig {
            index: 2,
            field: "logo".to_string(),
            source: ImageSource::ReferenceId,
            fit: FitMode::Stretch,
        },
        // 投影片上沒有 {{badge}}，不會下載
        ImageFieldConfig {
            index: 3,
            field: "badge".to_string(),
            source: ImageSource::Url,
            fit: FitMode::Contain,
        },
    ]);

    let result = generator(&storage).generate(&data, &cfg).await.unwrap();
    photo_mock.assert_hits(1);
    assert_eq!(result.slides_generated, 2);

    let deck = storage.open(&result.file_id).await.unwrap();

    let alice = &deck.slides[0];
    assert_eq!(
        paint_kinds(alice),
        vec!["other", "image", "shape", "image", "shape", "shape"]
    );
    let placed = images(alice);
    assert_eq!(placed[0].transform, frame(0.0, 25.0, 100.0, 50.0, 0.0));
    assert_eq!(placed[0].native_size, Some(Size::new(200.0, 100.0)));
    assert_eq!(placed[1].transform, frame(200.0, 0.0, 50.0, 50.0, 0.0));
    assert_eq!(placed[1].native_size, Some(Size::new(20.0, 10.0)));
    let zwsp = ZERO_WIDTH_SPACE.to_string();
    assert_eq!(texts(alice), vec![zwsp.clone(), zwsp.clone(), "Alice".to_string()]);

    // 第二列 photo 為空：只移除文字；logo 仍以 &id= 找到
    let bob = &deck.slides[1];
    assert_eq!(paint_kinds(bob), vec!["other", "shape", "image", "shape", "shape"]);
    let placed = images(bob);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].transform, frame(200.0, 0.0, 50.0, 50.0, 0.0));
    assert_eq!(texts(bob), vec![zwsp.clone(), zwsp, "Bob".to_string()]);
}

#[tokio::test]
async fn test_undecodable_reference_falls_back_to_stretch() {
    let (temp_dir, storage) = setup(person_slide()).await;
    std::fs::write(temp_dir.path().join("blobs/BROKEN_REF.bin"), b"not an image").unwrap();

    let data = dataset(vec![vec![json!("Alice"), json!("Paris"), json!("BROKEN_REF")]]);

    for fit in [FitMode::Contain, FitMode::Cover] {
        let cfg = config(vec![photo_field(ImageSource::ReferenceId, fit)]);
        let result = generator(&storage).generate(&data, &cfg).await.unwrap();
        let deck = storage.open(&result.file_id).await.unwrap();
        let slide = &deck.slides[0];

        let image = images(slide)[0];
        assert_eq!(image.native_size, None);
        assert_eq!(image.transform, frame(100.0, 50.0, 200.0, 100.0, 15.0));
        assert!(image.crop.is_none());
        assert_eq!(paint_kinds(slide), vec!["other", "image", "group", "shape"]);
        assert_eq!(deck.media[&image.media_id].bytes, b"not an image".to_vec());
    }
}
