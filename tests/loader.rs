//! Document loader integration tests.
//!
//! These drive the public loader API through an in-memory decoder whose
//! pages are solid colours of known size, so they run without pdfium.

mod common;

use common::*;
use pdf_canvas::{LoadConfig, LoadError, LoadProgressCallback, PAGE_SPACING};
use std::sync::{Arc, Mutex};

// ── Page count and order ─────────────────────────────────────────────────────

#[tokio::test]
async fn returns_every_page_in_source_order() {
    let pages: Vec<_> = (1..=5)
        .map(|i| SyntheticPage::new(100.0 * i as f64, 200.0, WHITE))
        .collect();
    let decoder = SyntheticDecoder::new(pages);
    let log = Arc::clone(&decoder.log);
    let doc = loader_for(decoder)
        .load_document("five.pdf", PDF_BYTES.to_vec())
        .await
        .expect("load should succeed");

    assert_eq!(doc.name, "five.pdf");
    assert_eq!(doc.page_count(), 5);
    for (i, page) in doc.pages.iter().enumerate() {
        assert_close(page.bounds.width, 150.0 * (i + 1) as f64, "width");
    }
    assert_eq!(log.lock().unwrap().rendered, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn identifiers_are_unique_per_page() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(10.0, 10.0, WHITE); 3]);
    let doc = loader_for(decoder)
        .load_document("ids.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let mut seen = std::collections::HashSet::new();
    for page in &doc.pages {
        assert!(seen.insert(page.asset_id.to_string()));
        assert!(seen.insert(page.shape_id.to_string()));
    }
    assert_eq!(seen.len(), 6);
}

// ── Geometry ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_are_stacked_with_spacing() {
    let decoder = SyntheticDecoder::new(vec![
        SyntheticPage::new(300.0, 120.0, WHITE),
        SyntheticPage::new(200.0, 700.0, BLACK),
        SyntheticPage::new(612.0, 792.0, WHITE),
        SyntheticPage::new(50.0, 0.5, WHITE),
    ]);
    let doc = loader_for(decoder)
        .load_document("stack.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    assert_eq!(doc.pages[0].bounds.y, 0.0);
    for pair in doc.pages.windows(2) {
        let (a, b) = (&pair[0].bounds, &pair[1].bounds);
        assert!(
            b.y - a.y >= a.height + PAGE_SPACING - 1e-9,
            "page at y={} overlaps the one at y={}",
            b.y,
            a.y
        );
    }
}

#[tokio::test]
async fn pages_are_centred_on_the_widest() {
    let decoder = SyntheticDecoder::new(vec![
        SyntheticPage::new(300.0, 100.0, WHITE),
        SyntheticPage::new(612.0, 100.0, WHITE),
        SyntheticPage::new(17.0, 100.0, WHITE),
    ]);
    let doc = loader_for(decoder)
        .load_document("centre.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let widest = doc.widest_width();
    assert_close(widest, 918.0, "widest");
    for page in &doc.pages {
        assert!(page.bounds.x >= 0.0);
        assert!(page.bounds.right() <= widest + 1e-9);
        assert_close(page.bounds.center_x(), widest / 2.0, "centre");
    }
    assert_eq!(doc.pages[1].bounds.x, 0.0);
}

#[tokio::test]
async fn single_letter_page_at_origin() {
    // 408 × 528 pt at 1.5× visual scale lays out as 612 × 792.
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(408.0, 528.0, WHITE)]);
    let doc = loader_for(decoder)
        .load_document("letter.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let b = doc.pages[0].bounds;
    assert_eq!((b.x, b.y, b.width, b.height), (0.0, 0.0, 612.0, 792.0));
}

#[tokio::test]
async fn narrow_then_wide_pages() {
    let decoder = SyntheticDecoder::new(vec![
        SyntheticPage::with_layout_size(400.0, 600.0, WHITE),
        SyntheticPage::with_layout_size(600.0, 600.0, WHITE),
    ]);
    let doc = loader_for(decoder)
        .load_document("two.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let (p1, p2) = (doc.pages[0].bounds, doc.pages[1].bounds);
    assert_close(p1.x, 100.0, "page 1 x");
    assert_close(p1.y, 0.0, "page 1 y");
    assert_close(p2.x, 0.0, "page 2 x");
    assert_close(p2.y, 632.0, "page 2 y");
}

#[tokio::test]
async fn previous_page_is_dropped_before_the_next_render() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(400.0, 400.0, WHITE); 3]);
    let log = Arc::clone(&decoder.log);
    loader_for(decoder)
        .load_document("big.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.surface_sizes, vec![(600, 600); 3]);
    assert_eq!(log.held_at_start, vec![0, 0, 0]);
}

#[tokio::test]
async fn device_pixel_ratio_changes_raster_not_layout() {
    let page = SyntheticPage::new(100.0, 80.0, WHITE);

    let lo_decoder = SyntheticDecoder::new(vec![page]);
    let lo_log = Arc::clone(&lo_decoder.log);
    let lo = loader_for(lo_decoder)
        .load_document("a.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let hi_decoder = SyntheticDecoder::new(vec![page]);
    let hi_log = Arc::clone(&hi_decoder.log);
    let config = LoadConfig::builder().device_pixel_ratio(2.0).build().unwrap();
    let hi = loader_with_config(hi_decoder, config)
        .load_document("a.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    assert_eq!(lo.pages[0].bounds, hi.pages[0].bounds);
    assert_eq!(lo_log.lock().unwrap().surface_sizes, vec![(150, 120)]);
    assert_eq!(hi_log.lock().unwrap().surface_sizes, vec![(300, 240)]);
}

// ── Brightness ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn white_page_is_light_black_page_is_dark() {
    let decoder = SyntheticDecoder::new(vec![
        SyntheticPage::new(50.0, 50.0, WHITE),
        SyntheticPage::new(50.0, 50.0, BLACK),
        SyntheticPage::new(50.0, 50.0, [200, 200, 190, 255]),
        SyntheticPage::new(50.0, 50.0, [30, 40, 60, 255]),
    ]);
    let doc = loader_for(decoder)
        .load_document("mixed.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let light: Vec<bool> = doc.pages.iter().map(|p| p.light_background).collect();
    assert_eq!(light, vec![true, false, true, false]);
}

#[tokio::test]
async fn strided_sampling_keeps_classification() {
    let pages = vec![
        SyntheticPage::new(64.0, 64.0, WHITE),
        SyntheticPage::new(64.0, 64.0, BLACK),
    ];
    let config = LoadConfig::builder().sample_stride(16).build().unwrap();
    let doc = loader_with_config(SyntheticDecoder::new(pages), config)
        .load_document("strided.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();
    assert!(doc.pages[0].light_background);
    assert!(!doc.pages[1].light_background);
}

// ── Output ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn images_are_png_data_urls_of_the_raster() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(20.0, 10.0, BLACK)]);
    let doc = loader_for(decoder)
        .load_document("img.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    let page = &doc.pages[0];
    assert!(page.image.starts_with("data:image/png;base64,"));
    let png = image::load_from_memory(&page.png_bytes().unwrap())
        .unwrap()
        .to_rgba8();
    assert_eq!(png.dimensions(), (30, 15));
    assert_eq!(png.get_pixel(0, 0).0, BLACK);
}

#[tokio::test]
async fn source_is_kept_and_decoder_gets_a_copy() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(10.0, 10.0, WHITE)]);
    let log = Arc::clone(&decoder.log);
    let doc = loader_for(decoder)
        .load_document("src.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    assert_eq!(&*doc.source, PDF_BYTES);
    assert_eq!(log.lock().unwrap().decoded_lengths, vec![PDF_BYTES.len()]);
}

#[tokio::test]
async fn password_reaches_decoder() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(10.0, 10.0, WHITE)]);
    let log = Arc::clone(&decoder.log);
    let config = LoadConfig::builder().password("s3cret").build().unwrap();
    loader_with_config(decoder, config)
        .load_document("locked.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();
    assert_eq!(
        log.lock().unwrap().passwords,
        vec![Some("s3cret".to_string())]
    );
}

#[tokio::test]
async fn loading_twice_is_idempotent() {
    let pages = vec![
        SyntheticPage::new(300.0, 400.0, WHITE),
        SyntheticPage::new(500.0, 400.0, BLACK),
    ];
    let loader = loader_for(SyntheticDecoder::new(pages));
    let a = loader.load_document("x.pdf", PDF_BYTES.to_vec()).await.unwrap();
    let b = loader.load_document("x.pdf", PDF_BYTES.to_vec()).await.unwrap();

    assert_eq!(a.page_count(), b.page_count());
    for (pa, pb) in a.pages.iter().zip(&b.pages) {
        assert_eq!(pa.bounds, pb.bounds);
        assert_eq!(pa.light_background, pb.light_background);
        assert_ne!(pa.shape_id, pb.shape_id);
    }
}

#[tokio::test]
async fn empty_document_has_no_pages() {
    let doc = loader_for(SyntheticDecoder::new(vec![]))
        .load_document("empty.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();
    assert!(doc.pages.is_empty());
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_pdf_bytes_fail_with_decode_error() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(10.0, 10.0, WHITE)]);
    let log = Arc::clone(&decoder.log);
    let err = loader_for(decoder)
        .load_document("photo.jpg", b"\xff\xd8\xff\xe0JFIF".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Decode { .. }), "got {err:?}");
    assert!(log.lock().unwrap().decoded_lengths.is_empty());
}

#[tokio::test]
async fn corrupt_pdf_fails_with_decode_error() {
    let err = loader_for(SyntheticDecoder::failing_decode())
        .load_document("broken.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_rendering_engine_is_an_environment_error() {
    let err = loader_for(SyntheticDecoder::unavailable())
        .load_document("any.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Environment(_)), "got {err:?}");
    assert!(err.to_string().contains("PDFIUM_LIB_PATH"));
}

#[tokio::test]
async fn one_bad_page_fails_the_whole_load() {
    let decoder = SyntheticDecoder::new(vec![SyntheticPage::new(10.0, 10.0, WHITE); 4])
        .failing_render_at(2);
    let log = Arc::clone(&decoder.log);
    let err = loader_for(decoder)
        .load_document("bad-page.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Render { page: 3, .. }), "got {err:?}");
    assert_eq!(log.lock().unwrap().rendered, vec![0, 1]);
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl LoadProgressCallback for EventLog {
    fn on_load_start(&self, total_pages: usize) {
        self.0.lock().unwrap().push(format!("start {total_pages}"));
    }

    fn on_page_rendered(&self, page_num: usize, total_pages: usize, light_background: bool) {
        self.0
            .lock()
            .unwrap()
            .push(format!("page {page_num}/{total_pages} {light_background}"));
    }

    fn on_load_complete(&self, total_pages: usize) {
        self.0.lock().unwrap().push(format!("done {total_pages}"));
    }
}

#[tokio::test]
async fn progress_events_follow_page_order() {
    let events = Arc::new(EventLog::default());
    let config = LoadConfig::builder()
        .progress_callback(Arc::clone(&events) as Arc<dyn LoadProgressCallback>)
        .build()
        .unwrap();
    let decoder = SyntheticDecoder::new(vec![
        SyntheticPage::new(10.0, 10.0, BLACK),
        SyntheticPage::new(10.0, 10.0, WHITE),
    ]);
    loader_with_config(decoder, config)
        .load_document("p.pdf", PDF_BYTES.to_vec())
        .await
        .unwrap();

    assert_eq!(
        *events.0.lock().unwrap(),
        vec!["start 2", "page 1/2 false", "page 2/2 true", "done 2"]
    );
}

#[test]
fn sync_wrapper_loads_outside_a_runtime() {
    let loader = loader_for(SyntheticDecoder::new(vec![SyntheticPage::new(
        10.0, 10.0, WHITE,
    )]));
    let doc = loader
        .load_document_sync("sync.pdf", PDF_BYTES.to_vec())
        .unwrap();
    assert_eq!(doc.page_count(), 1);
}
