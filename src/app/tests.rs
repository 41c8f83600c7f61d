use std::cell::Cell;
use std::path::Path;

use super::*;
use crate::decode::ImageFileDecoder;
use crate::error::PixelizeError;
use crate::pixels::PixelArray;
use crate::present::headless::HeadlessPresenter;
use crate::turtle::screen::TurtleScreen;
use crate::turtle::{Rgb, Shape};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ColorMode(u16),
    Setup(f64, f64),
    ScreenSize(u32, u32),
    Delay(u64),
    Tracer(u32, u64),
    Title(String),
    ExitOnClick,
    Bye,
    Shape(Shape),
    Speed(u8),
    PenUp,
    PenDown,
    SetPos(f64, f64),
    Color(Rgb, Rgb),
    ShapeSize(f64, f64),
    Stamp,
}

#[derive(Debug, Default)]
struct RecordingSurface {
    calls: Vec<Call>,
    fail_stamps: bool,
}

impl RecordingSurface {
    fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }

    fn colors(&self) -> Vec<(Rgb, Rgb)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Color(pen, fill) => Some((*pen, *fill)),
                _ => None,
            })
            .collect()
    }
}

impl Screen for RecordingSurface {
    fn colormode(&mut self, max: u16) -> AppResult<()> {
        self.calls.push(Call::ColorMode(max));
        Ok(())
    }

    fn setup(&mut self, width: f64, height: f64) -> AppResult<()> {
        self.calls.push(Call::Setup(width, height));
        Ok(())
    }

    fn screensize(&mut self, canvas_width: u32, canvas_height: u32) -> AppResult<()> {
        self.calls.push(Call::ScreenSize(canvas_width, canvas_height));
        Ok(())
    }

    fn delay(&mut self, millis: u64) {
        self.calls.push(Call::Delay(millis));
    }

    fn tracer(&mut self, every: u32, delay_millis: u64) {
        self.calls.push(Call::Tracer(every, delay_millis));
    }

    fn title(&mut self, title: &str) -> AppResult<()> {
        self.calls.push(Call::Title(title.to_string()));
        Ok(())
    }

    fn canvas_size(&self) -> (u32, u32) {
        (1000, 1000)
    }

    fn exit_on_click(&mut self) -> AppResult<()> {
        self.calls.push(Call::ExitOnClick);
        Ok(())
    }

    fn bye(&mut self) -> AppResult<()> {
        self.calls.push(Call::Bye);
        Ok(())
    }
}

impl Pen for RecordingSurface {
    fn shape(&mut self, shape: Shape) {
        self.calls.push(Call::Shape(shape));
    }

    fn speed(&mut self, speed: u8) {
        self.calls.push(Call::Speed(speed));
    }

    fn pen_up(&mut self) {
        self.calls.push(Call::PenUp);
    }

    fn pen_down(&mut self) {
        self.calls.push(Call::PenDown);
    }

    fn set_pos(&mut self, x: f64, y: f64) -> AppResult<()> {
        self.calls.push(Call::SetPos(x, y));
        Ok(())
    }

    fn color(&mut self, pen: Rgb, fill: Rgb) -> AppResult<()> {
        self.calls.push(Call::Color(pen, fill));
        Ok(())
    }

    fn shape_size(&mut self, stretch_wid: f64, stretch_len: f64) {
        self.calls.push(Call::ShapeSize(stretch_wid, stretch_len));
    }

    fn stamp(&mut self) -> AppResult<usize> {
        if self.fail_stamps {
            return Err("stamp failed".into());
        }
        self.calls.push(Call::Stamp);
        Ok(self.count(&Call::Stamp))
    }
}

struct StubDecoder(Option<PixelArray>);

impl Decoder for StubDecoder {
    fn decode(&self, _path: &Path) -> Result<Option<PixelArray>, PixelizeError> {
        Ok(self.0.clone())
    }
}

fn run_recording(
    decoder: &impl Decoder,
    surface: RecordingSurface,
) -> (AppResult<RunOutcome>, Option<RecordingSurface>) {
    run_recording_with(decoder, &RunConfig::default(), surface)
}

fn run_recording_with(
    decoder: &impl Decoder,
    config: &RunConfig,
    surface: RecordingSurface,
) -> (AppResult<RunOutcome>, Option<RecordingSurface>) {
    let mut opened = None;
    let out = &mut opened;
    let outcome = run(decoder, config, move || {
        Ok(Probe {
            inner: surface,
            out,
        })
    });
    (outcome, opened)
}

/// Hands the recorded surface back to the test when the run drops it.
struct Probe<'a> {
    inner: RecordingSurface,
    out: &'a mut Option<RecordingSurface>,
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        *self.out = Some(std::mem::take(&mut self.inner));
    }
}

impl Screen for Probe<'_> {
    fn colormode(&mut self, max: u16) -> AppResult<()> {
        self.inner.colormode(max)
    }
    fn setup(&mut self, width: f64, height: f64) -> AppResult<()> {
        self.inner.setup(width, height)
    }
    fn screensize(&mut self, canvas_width: u32, canvas_height: u32) -> AppResult<()> {
        self.inner.screensize(canvas_width, canvas_height)
    }
    fn delay(&mut self, millis: u64) {
        self.inner.delay(millis)
    }
    fn tracer(&mut self, every: u32, delay_millis: u64) {
        self.inner.tracer(every, delay_millis)
    }
    fn title(&mut self, title: &str) -> AppResult<()> {
        self.inner.title(title)
    }
    fn canvas_size(&self) -> (u32, u32) {
        self.inner.canvas_size()
    }
    fn exit_on_click(&mut self) -> AppResult<()> {
        self.inner.exit_on_click()
    }
    fn bye(&mut self) -> AppResult<()> {
        self.inner.bye()
    }
}

impl Pen for Probe<'_> {
    fn shape(&mut self, shape: Shape) {
        self.inner.shape(shape)
    }
    fn speed(&mut self, speed: u8) {
        self.inner.speed(speed)
    }
    fn pen_up(&mut self) {
        self.inner.pen_up()
    }
    fn pen_down(&mut self) {
        self.inner.pen_down()
    }
    fn set_pos(&mut self, x: f64, y: f64) -> AppResult<()> {
        self.inner.set_pos(x, y)
    }
    fn color(&mut self, pen: Rgb, fill: Rgb) -> AppResult<()> {
        self.inner.color(pen, fill)
    }
    fn shape_size(&mut self, stretch_wid: f64, stretch_len: f64) {
        self.inner.shape_size(stretch_wid, stretch_len)
    }
    fn stamp(&mut self) -> AppResult<usize> {
        self.inner.stamp()
    }
}

#[test]
fn settings_are_applied_once_with_fixed_arguments() {
    let mut surface = RecordingSurface::default();
    apply_settings(&mut surface).expect("settings");
    assert_eq!(
        surface.calls,
        vec![
            Call::ColorMode(255),
            Call::Setup(0.6, 0.8),
            Call::ScreenSize(1000, 1000),
            Call::Delay(0),
            Call::Tracer(2000, 0),
            Call::Title("Pixelization App".to_string()),
        ]
    );
}

#[test]
fn full_run_configures_window_exactly_once() {
    let decoder = StubDecoder(Some(PixelArray::filled(10, 15, &[0, 0, 0])));
    let (outcome, surface) = run_recording(&decoder, RecordingSurface::default());
    assert_eq!(outcome.expect("run"), RunOutcome::Rendered { dots: 6 });

    let surface = surface.expect("surface was opened");
    for call in [
        Call::ColorMode(255),
        Call::Setup(0.6, 0.8),
        Call::ScreenSize(1000, 1000),
        Call::Delay(0),
        Call::Tracer(2000, 0),
        Call::Title("Pixelization App".to_string()),
        Call::ExitOnClick,
    ] {
        assert_eq!(surface.count(&call), 1, "{call:?}");
    }
    assert_eq!(surface.count(&Call::Stamp), 6);
    assert_eq!(surface.calls.last(), Some(&Call::ExitOnClick));
}

#[test]
fn decode_failure_never_opens_the_surface() {
    let opened = Cell::new(false);
    let outcome = run(&StubDecoder(None), &RunConfig::default(), || {
        opened.set(true);
        Ok(RecordingSurface::default())
    })
    .expect("decode failure is not an error");

    assert_eq!(outcome, RunOutcome::ImageUnavailable);
    assert!(!opened.get());
}

#[test]
fn missing_file_is_reported_not_raised() {
    let config = RunConfig {
        image_path: "no/such/image.png".into(),
        ..RunConfig::default()
    };
    let outcome = run(&ImageFileDecoder, &config, || -> AppResult<RecordingSurface> {
        panic!("surface must not be opened")
    })
    .expect("missing file is not an error");
    assert_eq!(outcome, RunOutcome::ImageUnavailable);
}

#[test]
fn single_color_image_is_stamped_in_rgb_order() {
    let decoder = StubDecoder(Some(PixelArray::filled(10, 10, &[10, 20, 30])));
    let (outcome, surface) = run_recording(&decoder, RecordingSurface::default());
    assert_eq!(outcome.expect("run"), RunOutcome::Rendered { dots: 4 });

    let rgb = Rgb::new(30, 20, 10);
    let colors = surface.expect("surface was opened").colors();
    assert_eq!(colors, vec![(rgb, rgb); 4]);
}

#[test]
fn five_by_five_image_draws_one_dot_at_minus_ninety_nine() {
    let decoder = StubDecoder(Some(PixelArray::filled(5, 5, &[1, 2, 3])));
    let (outcome, surface) = run_recording(&decoder, RecordingSurface::default());
    assert_eq!(outcome.expect("run"), RunOutcome::Rendered { dots: 1 });

    let surface = surface.expect("surface was opened");
    let rgb = Rgb::new(3, 2, 1);
    let dot_sequence = [
        Call::PenUp,
        Call::SetPos(-99.0, -99.0),
        Call::Color(rgb, rgb),
        Call::Stamp,
        Call::PenUp,
    ];
    assert!(
        surface
            .calls
            .windows(dot_sequence.len())
            .any(|w| w == dot_sequence),
        "{:?}",
        surface.calls
    );
}

#[test]
fn pen_is_prepared_once_before_drawing() {
    let decoder = StubDecoder(Some(PixelArray::filled(10, 10, &[0, 0, 0])));
    let (_, surface) = run_recording(&decoder, RecordingSurface::default());
    let surface = surface.expect("surface was opened");

    assert_eq!(surface.count(&Call::Shape(Shape::Circle)), 1);
    assert_eq!(surface.count(&Call::Speed(10)), 1);
    assert_eq!(surface.count(&Call::ShapeSize(0.2, 0.2)), 1);
    let first_stamp = surface
        .calls
        .iter()
        .position(|c| *c == Call::Stamp)
        .expect("stamped");
    let shape_size = surface
        .calls
        .iter()
        .position(|c| *c == Call::ShapeSize(0.2, 0.2))
        .expect("shape size set");
    assert!(shape_size < first_stamp);
    assert_eq!(surface.count(&Call::PenDown), 0);
}

#[test]
fn square_dots_are_configurable() {
    let decoder = StubDecoder(Some(PixelArray::filled(10, 10, &[0, 0, 0])));
    let config = RunConfig {
        dot_shape: Shape::Square,
        ..RunConfig::default()
    };
    let (outcome, surface) = run_recording_with(&decoder, &config, RecordingSurface::default());
    assert_eq!(outcome.expect("run"), RunOutcome::Rendered { dots: 4 });

    let surface = surface.expect("surface was opened");
    assert_eq!(surface.count(&Call::Shape(Shape::Square)), 1);
    assert_eq!(surface.count(&Call::Shape(Shape::Circle)), 0);
}

#[test]
fn dots_follow_row_major_order() {
    let decoder = StubDecoder(Some(PixelArray::filled(10, 15, &[0, 0, 0])));
    let (_, surface) = run_recording(&decoder, RecordingSurface::default());
    let positions: Vec<(f64, f64)> = surface
        .expect("surface was opened")
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::SetPos(x, y) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(
        positions,
        vec![
            (-99.0, -99.0),
            (-99.0, -94.0),
            (-94.0, -99.0),
            (-94.0, -94.0),
            (-89.0, -99.0),
            (-89.0, -94.0),
        ]
    );
}

#[test]
fn drawing_error_closes_surface_and_propagates() {
    let decoder = StubDecoder(Some(PixelArray::filled(5, 5, &[0, 0, 0])));
    let surface = RecordingSurface {
        fail_stamps: true,
        ..RecordingSurface::default()
    };
    let (outcome, surface) = run_recording(&decoder, surface);
    assert!(outcome.is_err());

    let surface = surface.expect("surface was opened");
    assert_eq!(surface.calls.last(), Some(&Call::Bye));
    assert_eq!(surface.count(&Call::ExitOnClick), 0);
}

#[test]
fn malformed_shape_propagates() {
    let decoder = StubDecoder(Some(PixelArray::filled(5, 5, &[7])));
    let (outcome, surface) = run_recording(&decoder, RecordingSurface::default());
    let err = outcome.expect_err("single channel image");
    assert!(err.to_string().contains("3 color channels"));
    assert_eq!(surface.expect("surface was opened").calls.last(), Some(&Call::Bye));
}

#[test]
fn headless_run_paints_upright_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.png");
    // top half red, bottom half blue
    let picture = image::RgbImage::from_fn(20, 20, |_, y| {
        if y < 10 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    picture.save(&path).expect("write png");
    let config = RunConfig {
        image_path: path,
        ..RunConfig::default()
    };

    let outcome = run(&ImageFileDecoder, &config, || {
        TurtleScreen::open(HeadlessPresenter::default(), None)
    });
    assert_eq!(outcome.expect("headless run"), RunOutcome::Rendered { dots: 16 });

    let mut screen = TurtleScreen::open(HeadlessPresenter::default(), None).expect("open");
    let image = load_image(&ImageFileDecoder, &config.image_path)
        .image
        .expect("decoded");
    assert_eq!(draw_image(&mut screen, &image, &config).expect("draw"), 16);

    let canvas = screen.canvas();
    assert_eq!((canvas.width, canvas.height), (1000, 1000));
    // the picture's top edge ends up at the largest y
    let (x, y) = crate::dots::canvas_position(1, 16);
    assert_eq!(canvas.at(x, y), Some([255, 0, 0]));
    let (x, y) = crate::dots::canvas_position(1, 1);
    assert_eq!(canvas.at(x, y), Some([0, 0, 255]));
    assert_eq!(screen.presenter().title.as_deref(), Some("Pixelization App"));
}

#[test]
fn headless_run_with_square_dots_fills_corners() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("green.png");
    image::RgbImage::from_pixel(6, 6, image::Rgb([0, 200, 0]))
        .save(&path)
        .expect("write png");
    let config = RunConfig {
        image_path: path,
        dot_shape: Shape::Square,
        ..RunConfig::default()
    };
    let image = load_image(&ImageFileDecoder, &config.image_path)
        .image
        .expect("decoded");

    let mut screen = TurtleScreen::open(HeadlessPresenter::default(), None).expect("open");
    assert_eq!(draw_image(&mut screen, &image, &config).expect("draw"), 4);

    // a 0.2 stretch square spans two pixels either side of its center;
    // a circle that size leaves the diagonal corner blank
    let (x, y) = crate::dots::canvas_position(1, 1);
    assert_eq!(screen.canvas().at(x + 1.5, y + 1.5), Some([0, 200, 0]));
}
