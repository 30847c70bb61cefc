use stroke_fit::core::init_with_level;
use stroke_fit::fit;
use stroke_fit::SearchOptions;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = init_with_level(log::LevelFilter::Info);

    let mut args = std::env::args().skip(1);
    let (Some(source_path), Some(target_path)) = (args.next(), args.next()) else {
        eprintln!("Usage: fit_strokes <source_image> <target_image>");
        return Ok(());
    };

    let source = image::open(source_path)?.to_luma8();
    let target = image::open(target_path)?.to_luma8();

    let result = fit::fit_raster_default(
        &fit::gray_view(&source),
        &fit::gray_view(&target),
        SearchOptions::default(),
    )?;

    println!(
        "loss {:.0} after {} iterations ({:?})",
        result.loss, result.iterations, result.stop
    );
    println!("{:#?}", result.transform);
    Ok(())
}
