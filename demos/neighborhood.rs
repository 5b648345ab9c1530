use std::env;

use imageops_spatial::{
    BlurKernel, BoxFilter, EdgeFilter, GaussianFilter, IntensityTransform, Laplacian,
    MedianFilter, Morphology, PaddingMode, PixelBuffer, Shape, Sharpen, SharpeningMethod,
    StructuringElement, Threshold,
};

const OPERATIONS: &str = "box | gaussian | median | laplacian | sobel | sharpen | unsharp | \
highboost | threshold | otsu | adaptive-mean | adaptive-gaussian | erode | dilate | open | \
close | boundary | negative | gray";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!(
            "Usage: {} <input.bmp> <operation> <output.bmp> [padding] [size]",
            args[0]
        );
        eprintln!("Operations: {OPERATIONS}");
        eprintln!("Example: {} input.bmp gaussian output.bmp mirror 5", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let operation = args[2].as_str();
    let output_path = &args[3];
    let padding: PaddingMode = args.get(4).map_or(Ok(PaddingMode::Replicate), |s| s.parse())?;
    let size: u32 = args.get(5).map_or(Ok(3), |s| s.parse())?;

    // 入力画像を読み込み
    let image = PixelBuffer::open(input_path)?;
    let (width, height) = image.dimensions();
    println!(
        "Processing {}-channel image: {}x{} ({} / {}, size {})",
        image.channels(),
        width,
        height,
        operation,
        padding,
        size
    );

    let element = StructuringElement::new(Shape::Square, size);
    let processed = match operation {
        "box" => image.box_filter(size, padding)?,
        "gaussian" => image.gaussian_filter(size, size as f32 / 6.0, padding)?,
        "median" => image.median_filter(size, padding)?,
        "laplacian" => image.laplacian(Laplacian::Basic, false, padding)?,
        "sobel" => image.sobel()?,
        "sharpen" => image.sharpen(SharpeningMethod::BasicLaplacian, padding)?,
        "unsharp" => image.unsharp_mask(BlurKernel::Gaussian, size, 1.0, padding)?,
        "highboost" => image.highboost(BlurKernel::Gaussian, size, 2.0, 1.0, padding)?,
        // 2値化とモルフォロジーは単一チャンネルのみ
        "threshold" => image.to_grayscale().fixed_threshold(128)?,
        "otsu" => image.to_grayscale().otsu_threshold()?,
        "adaptive-mean" => image.to_grayscale().adaptive_mean_threshold(size, 5)?,
        "adaptive-gaussian" => image.to_grayscale().adaptive_gaussian_threshold(size, 5)?,
        "erode" => image.to_grayscale().erode(&element, padding)?,
        "dilate" => image.to_grayscale().dilate(&element, padding)?,
        "open" => image.to_grayscale().open(&element, padding)?,
        "close" => image.to_grayscale().close(&element, padding)?,
        "boundary" => image.to_grayscale().boundary(&element, padding)?,
        "negative" => image.negative()?,
        "gray" => image.to_grayscale(),
        other => {
            eprintln!("Unknown operation '{other}'. Operations: {OPERATIONS}");
            std::process::exit(1);
        }
    };

    processed.save(output_path)?;
    println!("Saved processed image to: {output_path}");

    Ok(())
}
