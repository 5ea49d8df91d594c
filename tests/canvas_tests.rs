use paint_window::core::{
    Canvas, Color, DrawTarget, FrameRenderer, PixelFormat, RasterProvider, RowOrder, Scene, Surface,
    SurfaceProvider,
};

fn render(scene: Scene, format: PixelFormat) -> Canvas {
    let mut canvas = RasterProvider::new(format).create_surface(800, 600).unwrap();
    FrameRenderer::new(scene).render_frame(&mut canvas);
    canvas
}

#[test]
fn test_surface_size_is_width_height_4() {
    let provider = RasterProvider::new(PixelFormat::Rgba8Premul);
    for (w, h) in [(1, 1), (2, 3), (640, 480), (800, 600)] {
        let surface = provider.create_surface(w, h).unwrap();
        assert_eq!(Surface::pixels(&surface).unwrap().len(), (w * h * 4) as usize);
    }
}

#[test]
fn test_diagonal_line_scene() {
    let canvas = render(Scene::DiagonalLine, PixelFormat::Rgba8Premul);

    assert_eq!(canvas.pixel(100, 100), Some(Color::RED));
    assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
    // Midpoint of (100,100)-(700,500)
    assert_eq!(canvas.pixel(400, 300), Some(Color::RED));
    assert_eq!(canvas.pixel(700, 100), Some(Color::WHITE));
}

#[test]
fn test_vertical_line_scene() {
    let canvas = render(Scene::VerticalLine, PixelFormat::Rgba8Premul);

    for x in 99..=101 {
        assert_eq!(canvas.pixel(x, 300), Some(Color::RED), "column {x}");
    }
    assert_eq!(canvas.pixel(98, 300), Some(Color::WHITE));
    assert_eq!(canvas.pixel(102, 300), Some(Color::WHITE));
    assert_eq!(canvas.pixel(100, 500), Some(Color::WHITE));
}

#[test]
fn test_blue_rect_scene() {
    let canvas = render(Scene::BlueRect, PixelFormat::Rgba8Premul);

    assert_eq!(canvas.pixel(150, 250), Some(Color::BLUE));
    assert_eq!(canvas.pixel(400, 400), Some(Color::WHITE));
    assert_eq!(canvas.pixel(100, 200), Some(Color::BLUE));
    assert_eq!(canvas.pixel(299, 499), Some(Color::BLUE));
    assert_eq!(canvas.pixel(300, 499), Some(Color::WHITE));
    assert_eq!(canvas.pixel(299, 500), Some(Color::WHITE));
}

#[test]
fn test_rendering_is_deterministic() {
    for scene in [Scene::DiagonalLine, Scene::VerticalLine, Scene::BlueRect] {
        let first = render(scene, PixelFormat::Rgba8Premul);
        let second = render(scene, PixelFormat::Rgba8Premul);
        assert_eq!(first.pixels(), second.pixels(), "{scene:?}");
    }
}

#[test]
fn test_frame_fully_overwrites_previous() {
    let mut canvas = render(Scene::BlueRect, PixelFormat::Rgba8Premul);
    FrameRenderer::new(Scene::DiagonalLine).render_frame(&mut canvas);

    let fresh = render(Scene::DiagonalLine, PixelFormat::Rgba8Premul);
    assert_eq!(canvas.pixels(), fresh.pixels());
}

#[test]
fn test_bgra_canvas_matches_rgba_colors() {
    let rgba = render(Scene::BlueRect, PixelFormat::Rgba8Premul);
    let bgra = render(Scene::BlueRect, PixelFormat::Bgra8Premul);

    assert_eq!(bgra.pixel(150, 250), rgba.pixel(150, 250));
    let idx = (250 * 800 + 150) * 4;
    assert_eq!(&rgba.pixels()[idx..idx + 4], &[0, 0, 255, 255]);
    assert_eq!(&bgra.pixels()[idx..idx + 4], &[255, 0, 0, 255]);
}

#[test]
fn test_bottom_up_canvas_reads_the_same() {
    let provider = RasterProvider::new(PixelFormat::Rgba8Premul).with_row_order(RowOrder::BottomUp);
    let mut canvas = provider.create_surface(800, 600).unwrap();
    FrameRenderer::new(Scene::BlueRect).render_frame(&mut canvas);

    assert_eq!(canvas.pixel(150, 250), Some(Color::BLUE));
    assert_eq!(canvas.pixel(400, 400), Some(Color::WHITE));

    // Screen row 250 is stored at row 599 - 250
    let idx = ((599 - 250) * 800 + 150) * 4;
    assert_eq!(&canvas.pixels()[idx..idx + 4], &[0, 0, 255, 255]);
}

#[test]
fn test_commands_outside_canvas_are_clipped() {
    let mut canvas = RasterProvider::new(PixelFormat::Rgba8Premul).create_surface(50, 50).unwrap();
    canvas.execute(&paint_window::DrawCommand::FillRect {
        rect: paint_window::Rect::from_ltrb(100.0, 100.0, 200.0, 200.0),
        color: Color::BLUE,
    });
    assert!(canvas.pixels().iter().all(|&b| b == 0));
}
