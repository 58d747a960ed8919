use winhist_image::{Image, ImageSize, Rect};
use winhist_imgproc::integral::IntegralHistogram;
use winhist_imgproc::search::find_best_window;

/// Paint a textured 6x5 target onto a gradient background at (x, y).
fn render_frame(size: ImageSize, x: usize, y: usize) -> Vec<u8> {
    let mut data: Vec<u8> = (0..size.width * size.height)
        .map(|i| ((i % size.width) * 2) as u8)
        .collect();
    for dy in 0..5 {
        for dx in 0..6 {
            data[(y + dy) * size.width + (x + dx)] = 180 + ((dx + dy) * 7) as u8;
        }
    }
    data
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let size = ImageSize {
        width: 64,
        height: 48,
    };
    let window = ImageSize {
        width: 6,
        height: 5,
    };

    // first frame: target at a known position
    let first = Image::<u8, 1>::new(size, render_frame(size, 12, 20))?;
    let index = IntegralHistogram::from_image(&first, 16)?;
    let reference = index.histogram(&Rect::new(12, 20, window.width, window.height))?;
    println!("reference histogram: {reference:?}");

    // second frame: the target has moved; search a strip around its old row
    let second = Image::<u8, 1>::new(size, render_frame(size, 41, 23))?;
    let index = IntegralHistogram::from_image(&second, 16)?;

    let strip = Rect::new(0, 16, size.width, 16);
    match find_best_window(&index, &reference, window, &strip)? {
        Some(found) => println!(
            "best window at ({}, {}) with score {}",
            found.x, found.y, found.score
        ),
        None => println!("window does not fit inside the search strip"),
    }

    Ok(())
}
