use paint_window::core::{
    copy_rows, pack_rows, CopyOutcome, FrameRenderer, PixelFormat, RasterProvider, RowLayout,
    RowOrder, Scene, SkipReason, SurfaceProvider,
};

const SENTINEL: u8 = 0xAB;

fn numbered(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_wider_source_copies_destination_width() {
    // 4 px source rows padded to 24 bytes, 2 px destination rows
    let src = numbered(24 * 3);
    let mut dst = vec![SENTINEL; 8 * 3];

    let outcome = copy_rows(&src, RowLayout::new(24, 4), &mut dst, RowLayout::new(8, 4), 3, false);

    assert_eq!(outcome, CopyOutcome::Copied { rows: 3, row_bytes: 8 });
    for y in 0..3 {
        assert_eq!(&dst[y * 8..y * 8 + 8], &src[y * 24..y * 24 + 8]);
    }
}

#[test]
fn test_wider_destination_keeps_padding() {
    let src = numbered(8 * 3);
    let mut dst = vec![SENTINEL; 20 * 3];

    let outcome = copy_rows(&src, RowLayout::new(8, 4), &mut dst, RowLayout::new(20, 4), 3, false);

    assert_eq!(outcome, CopyOutcome::Copied { rows: 3, row_bytes: 8 });
    for y in 0..3 {
        let row = &dst[y * 20..(y + 1) * 20];
        assert_eq!(&row[..8], &src[y * 8..(y + 1) * 8]);
        assert!(row[8..].iter().all(|&b| b == SENTINEL), "row {y} padding touched");
    }
}

#[test]
fn test_short_destination_is_not_overrun() {
    let src = numbered(16 * 4);
    // Room for two and a half rows
    let mut dst = vec![SENTINEL; 16 * 2 + 8];

    let outcome = copy_rows(&src, RowLayout::new(16, 4), &mut dst, RowLayout::new(16, 4), 4, false);

    assert_eq!(outcome, CopyOutcome::Copied { rows: 2, row_bytes: 16 });
    assert!(dst[32..].iter().all(|&b| b == SENTINEL));
}

#[test]
fn test_flip_puts_last_source_row_first() {
    let src = numbered(12 * 5);
    let mut dst = vec![0u8; 12 * 5];

    copy_rows(&src, RowLayout::new(12, 4), &mut dst, RowLayout::new(12, 4), 5, true);

    assert_eq!(&dst[0..12], &src[48..60]);
    assert_eq!(&dst[48..60], &src[0..12]);
    assert_eq!(&dst[24..36], &src[24..36]);
}

#[test]
fn test_mismatched_pixel_size_is_skipped() {
    let src = numbered(12);
    let mut dst = vec![SENTINEL; 16];

    let outcome = copy_rows(&src, RowLayout::new(12, 3), &mut dst, RowLayout::new(16, 4), 1, false);

    assert_eq!(
        outcome,
        CopyOutcome::Skipped(SkipReason::BytesPerPixelMismatch { source: 3, destination: 4 })
    );
    assert!(dst.iter().all(|&b| b == SENTINEL));
}

#[test]
fn test_bottom_up_canvas_copies_to_top_down_window() {
    let provider = RasterProvider::new(PixelFormat::Bgra8Premul).with_row_order(RowOrder::BottomUp);
    let mut canvas = provider.create_surface(800, 600).unwrap();
    FrameRenderer::new(Scene::BlueRect).render_frame(&mut canvas);

    let info = canvas.info();
    let mut window = vec![0u8; info.byte_len()];
    copy_rows(
        canvas.pixels(),
        RowLayout::new(info.stride(), 4),
        &mut window,
        RowLayout::new(info.stride(), 4),
        info.height as usize,
        info.row_order.needs_flip(RowOrder::TopDown),
    );

    // Screen pixel (150, 250) in BGRA
    let idx = (250 * 800 + 150) * 4;
    assert_eq!(&window[idx..idx + 4], &[255, 0, 0, 255]);
    let idx = (400 * 800 + 400) * 4;
    assert_eq!(&window[idx..idx + 4], &[255, 255, 255, 255]);
}

#[test]
fn test_pack_rows_drops_stride_padding() {
    let padded = numbered(16 * 2);
    let packed = pack_rows(&padded, 16, 12, 2);
    assert_eq!(packed.len(), 24);
    assert_eq!(&packed[..12], &padded[..12]);
    assert_eq!(&packed[12..], &padded[16..28]);
}
