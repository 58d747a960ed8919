use winhist_image::{Image, ImageSize, Rect};
use winhist_imgproc::error::HistogramError;
use winhist_imgproc::histogram::{compute_histogram, intersection};
use winhist_imgproc::integral::IntegralHistogram;
use winhist_imgproc::search::find_best_window;

const WIDTH: usize = 48;
const HEIGHT: usize = 36;

/// A noisy gradient frame with a textured 5x4 target pasted at (x, y).
fn render_frame(x: usize, y: usize) -> Image<u8, 1> {
    let mut data: Vec<u8> = (0..WIDTH * HEIGHT)
        .map(|i| ((i * 29 + i / WIDTH * 13) % 128) as u8)
        .collect();
    for dy in 0..4 {
        for dx in 0..5 {
            data[(y + dy) * WIDTH + (x + dx)] = 192 + ((dx * dy) % 32) as u8;
        }
    }
    Image::new(
        ImageSize {
            width: WIDTH,
            height: HEIGHT,
        },
        data,
    )
    .unwrap()
}

#[test]
fn tracks_target_between_frames() -> Result<(), HistogramError> {
    let window = ImageSize {
        width: 5,
        height: 4,
    };

    // reference histogram of the target region in the first frame
    let first = render_frame(9, 14);
    let first_index = IntegralHistogram::from_image(&first, 16)?;
    let reference = first_index.histogram(&Rect::new(9, 14, window.width, window.height))?;
    assert_eq!(reference.iter().sum::<u64>(), (window.width * window.height) as u64);

    // the target moved; search a horizontal strip around its old row
    let second = render_frame(31, 17);
    let index = IntegralHistogram::from_image(&second, 16)?;
    let strip = Rect::new(0, 12, WIDTH, 12);

    let found = find_best_window(&index, &reference, window, &strip)?.expect("window fits");
    assert_eq!((found.x, found.y), (31, 17));

    // the reported score is the intersection of the window's own histogram
    let window_hist = index.histogram(&Rect::new(found.x, found.y, window.width, window.height))?;
    assert_eq!(found.score, intersection(&reference, &window_hist)?);

    Ok(())
}

#[test]
fn index_histogram_agrees_with_direct_histogram() -> Result<(), HistogramError> {
    let frame = render_frame(20, 8);
    let index = IntegralHistogram::from_image(&frame, 16)?;

    // whole-frame query must equal the direct whole-image histogram
    let mut direct = vec![0u64; 16];
    compute_histogram(&frame, &mut direct, 16)?;
    let queried = index.histogram(&Rect::new(0, 0, WIDTH, HEIGHT))?;
    assert_eq!(queried, direct);

    Ok(())
}

#[test]
fn failed_queries_leave_the_index_retryable() -> Result<(), HistogramError> {
    let frame = render_frame(10, 10);
    let index = IntegralHistogram::from_image(&frame, 8)?;

    assert!(index.histogram(&Rect::new(WIDTH - 1, 0, 2, 2)).is_err());
    assert!(index.histogram_window(0, 0, 3).is_err());

    let hist = index.histogram(&Rect::new(WIDTH - 2, 0, 2, 2))?;
    assert_eq!(hist.iter().sum::<u64>(), 4);

    Ok(())
}
