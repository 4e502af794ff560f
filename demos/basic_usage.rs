// ============================================================================
// Basic Usage Example
// ============================================================================

use amount_engine::prelude::*;

fn main() -> AmountResult<()> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Amount Engine Example ===\n");

    let engine = ConversionEngineBuilder::cldr_core()
        .log_rendering(true)
        .build()?;
    println!("Loaded {} units\n", engine.graph().len());

    // Precision comes from the literal
    println!("=== Precision ===");
    let price: Amount = "123.456".parse()?;
    println!(
        "{} -> {} significant, {} fractional digits",
        price,
        price.significant_digits(),
        price.fractional_digits()
    );
    println!(
        "fractionDigits 4:    {}",
        price.with(&WithOptions::new().with_fraction_digits(4))?
    );
    for mode in [RoundingMode::HalfEven, RoundingMode::Trunc, RoundingMode::Ceil] {
        let rounded = price.with(
            &WithOptions::new()
                .with_significant_digits(5)
                .with_rounding_mode(mode),
        )?;
        println!("significantDigits 5 ({mode}): {rounded}");
    }

    // Explicit unit conversion
    println!("\n=== Conversion ===");
    let length = Amount::from_f64(1.75, &AmountOptions::new().with_unit("foot"))?;
    println!("{} = {}", length, length.convert_to(&engine, &ConvertOptions::to_unit("inch"))?);

    let temperature: Amount = "21.5[celsius]".parse()?;
    let fahrenheit = temperature.convert_to(
        &engine,
        &ConvertOptions::to_unit("fahrenheit").with_fraction_digits(1, 1),
    )?;
    println!("{temperature} = {fahrenheit}");

    // Locale-driven conversion
    println!("\n=== Preferences ===");
    let height: Amount = "180[centimeter]".parse()?;
    for locale in ["en-US", "en-GB", "fr-FR"] {
        let converted = height.convert_to(
            &engine,
            &ConvertOptions::for_locale(locale).with_usage("person-height"),
        )?;
        println!("{height} in {locale}: {converted}");
    }

    let weight: Amount = "80[kilogram]".parse()?;
    for locale in ["en-US", "en-GB", "de-DE"] {
        let converted = weight.convert_to(
            &engine,
            &ConvertOptions::for_locale(locale).with_usage("person"),
        )?;
        let text = engine.render(&converted, Some(locale), DisplayOptions::default())?;
        println!("{weight} in {locale}: {text}");
    }

    // Errors
    println!("\n=== Errors ===");
    let cash: Amount = "10[USD]".parse()?;
    if let Err(error) = cash.convert_to(&engine, &ConvertOptions::to_unit("EUR")) {
        println!("{cash} -> EUR: {error}");
    }
    if let Err(error) = length.convert_to(&engine, &ConvertOptions::to_unit("kilogram")) {
        println!("{length} -> kilogram: {error}");
    }
    if let Err(error) = length.convert_to(&engine, &ConvertOptions::to_unit("inch").with_locale("fr")) {
        println!("unit + locale: {error}");
    }

    Ok(())
}
