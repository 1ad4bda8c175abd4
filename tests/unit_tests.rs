// tests/unit_tests.rs
use cropsight::io::writer::{dequantize, quantize};
use cropsight::processing::classify::{classify_raster, BandThresholds, HealthBand};
use cropsight::processing::indices::{IndexCalculator, Ndvi, Vari};
use cropsight::processing::joint_mask;
use cropsight::raster::Raster;
use cropsight::render;

/// Helper to build a band raster from a repeating value pattern
fn band(width: usize, height: usize, values: &[f32]) -> Raster {
    let data = (0..width * height)
        .map(|i| values[i % values.len()])
        .collect();
    Raster::from_vec(width, height, data)
}

/// Test VARI calculation with known values
#[test]
fn test_vari_calculation() {
    // (R, G, B, expected VARI)
    let test_cases = [
        (0.2, 0.6, 0.1, 0.57142),  // (0.6-0.2)/(0.6+0.2-0.1)
        (0.2, 0.2, 0.2, 0.0),      // gray, numerator is 0
        (0.5, 0.25, 0.25, -0.5),   // (0.25-0.5)/(0.25+0.5-0.25)
        (0.0, 1.0, 0.5, 2.0),      // result exceeds [-1,1], not clamped
    ];

    let red = band(2, 2, &test_cases.map(|(r, _, _, _)| r));
    let green = band(2, 2, &test_cases.map(|(_, g, _, _)| g));
    let blue = band(2, 2, &test_cases.map(|(_, _, b, _)| b));

    let vari = Vari::new(0, 1, 2, None);
    let result = vari.calculate(&[red, green, blue]);

    for (i, (_, _, _, expected)) in test_cases.iter().enumerate() {
        assert!(
            (result.data()[i] - expected).abs() < 0.001,
            "Expected {}, got {} at index {}",
            expected,
            result.data()[i],
            i
        );
    }
}

/// Test NDVI calculation with known values
#[test]
fn test_ndvi_calculation() {
    // (NIR, RED, expected NDVI)
    let test_cases = [
        (0.9, 0.1, 0.79999), // (0.9-0.1)/(0.9+0.1)
        (0.5, 0.5, 0.0),     // NIR = RED, numerator is 0
        (0.1, 0.9, -0.79999),
        (0.0, 0.0, 0.0), // stabilized zero denominator, numerator is 0
    ];

    let nir = band(2, 2, &test_cases.map(|(n, _, _)| n));
    let red = band(2, 2, &test_cases.map(|(_, r, _)| r));

    let ndvi = Ndvi::new(0, 1, None);
    let result = ndvi.calculate(&[nir, red]);

    for (i, (_, _, expected)) in test_cases.iter().enumerate() {
        assert!(
            (result.data()[i] - expected).abs() < 0.001,
            "Expected {}, got {} at index {}",
            expected,
            result.data()[i],
            i
        );
    }
}

/// The epsilon stabilizer keeps a zero VARI denominator finite
#[test]
fn test_vari_zero_denominator_is_finite() {
    // G + R - B = 0 exactly; only epsilon remains in the denominator
    let red = band(1, 1, &[0.2]);
    let green = band(1, 1, &[0.1]);
    let blue = band(1, 1, &[0.3]);

    let vari = Vari::new(0, 1, 2, None);
    let result = vari.calculate(&[red, green, blue]);

    assert!(result.data()[0].is_finite());
    // -0.1 / 1e-5
    assert!(result.data()[0] < -1000.0);
}

/// Test that custom names are properly set
#[test]
fn test_custom_index_names() {
    let custom_name = "Custom VARI Name";
    let vari = Vari::new(0, 1, 2, Some(custom_name.to_string()));
    assert_eq!(vari.name(), custom_name);

    let ndvi = Ndvi::new(0, 1, None);
    assert_eq!(ndvi.name(), "NDVI");
}

/// Test that required_bands returns the correct number for each calculator
#[test]
fn test_required_bands() {
    let vari = Vari::new(0, 1, 2, None);
    assert_eq!(vari.required_bands(), 3);

    let ndvi = Ndvi::new(0, 1, None);
    assert_eq!(ndvi.required_bands(), 2);
}

/// Quantization maps [-1,1] onto [0,255] and saturates outside it
#[test]
fn test_quantize_range() {
    assert_eq!(quantize(-1.0), 0);
    assert_eq!(quantize(1.0), 255);
    assert_eq!(quantize(0.0), 128); // 127.5 rounds away from zero
    assert_eq!(quantize(-5.0), 0); // saturate, never wrap
    assert_eq!(quantize(5.0), 255);

    assert!((dequantize(0) - -1.0).abs() < 1e-6);
    assert!((dequantize(255) - 1.0).abs() < 1e-6);
}

/// Re-encoding an already quantized value is a fixed point
#[test]
fn test_quantize_idempotent_on_levels() {
    for level in 0..=255u8 {
        assert_eq!(quantize(dequantize(level)), level);
    }
}

/// Band predicates: strict upper cutoffs, inclusive zero floor
#[test]
fn test_band_boundary_policy() {
    let ndvi = BandThresholds::NDVI;
    assert_eq!(ndvi.band(0.61), HealthBand::Healthy);
    assert_eq!(ndvi.band(0.6), HealthBand::Moderate); // boundary stays moderate
    assert_eq!(ndvi.band(0.2), HealthBand::Sparse); // boundary stays sparse
    assert_eq!(ndvi.band(0.0), HealthBand::Sparse); // zero floor inclusive
    assert_eq!(ndvi.band(-0.001), HealthBand::NonVegetated);

    let vari = BandThresholds::VARI;
    assert_eq!(vari.band(0.51), HealthBand::Healthy);
    assert_eq!(vari.band(0.5), HealthBand::Moderate);

    // The 8-bit midpoint straddles zero: 127 reconstructs below it, 128 above
    assert_eq!(ndvi.band(dequantize(127)), HealthBand::NonVegetated);
    assert_eq!(ndvi.band(dequantize(128)), HealthBand::Sparse);
}

/// Percentages are exhaustive and sum to 100 for a mixed raster
#[test]
fn test_classification_sums_to_100() {
    let raster = band(4, 4, &[0.9, 0.4, 0.1, -0.3]);
    let classification = classify_raster(&raster, BandThresholds::NDVI);

    assert_eq!(classification.total_pixels, 16);
    assert!((classification.healthy_pct - 25.0).abs() < 1e-9);
    assert!((classification.moderate_pct - 25.0).abs() < 1e-9);
    assert!((classification.sparse_pct - 25.0).abs() < 1e-9);
    assert!((classification.non_vegetated_pct - 25.0).abs() < 1e-9);

    let sum = classification.healthy_pct
        + classification.moderate_pct
        + classification.sparse_pct
        + classification.non_vegetated_pct;
    assert!((sum - 100.0).abs() < 1e-9);
}

/// Joint mask codes and their implications over a sweep of value pairs
#[test]
fn test_joint_mask_coverage() {
    let ndvi_threshold = 0.55;
    let vari_threshold = 0.175;

    let values: Vec<f32> = (0..=20).map(|i| i as f32 / 20.0).collect();
    let mut ndvi_values = Vec::new();
    let mut vari_values = Vec::new();
    for &n in &values {
        for &v in &values {
            ndvi_values.push(n);
            vari_values.push(v);
        }
    }
    let side = values.len();
    let ndvi = Raster::from_vec(side, side, ndvi_values.clone());
    let vari = Raster::from_vec(side, side, vari_values.clone());

    let mask = joint_mask(&ndvi, &vari, ndvi_threshold, vari_threshold);

    for (i, &code) in mask.iter().enumerate() {
        let n = ndvi_values[i];
        let v = vari_values[i];
        assert!(code <= 2);
        match code {
            1 => assert!(n >= ndvi_threshold && v >= vari_threshold),
            2 => assert!(n >= ndvi_threshold && v < vari_threshold),
            _ => assert!(n < ndvi_threshold),
        }
    }

    // The asymmetry: a passing VARI never promotes a failing-NDVI pixel
    let below = Raster::from_vec(1, 1, vec![0.54]);
    let high_vari = Raster::from_vec(1, 1, vec![1.0]);
    assert_eq!(joint_mask(&below, &high_vari, ndvi_threshold, vari_threshold), vec![0]);
}

/// Joint-mask threshold comparisons are inclusive
#[test]
fn test_joint_mask_threshold_inclusive() {
    let ndvi = Raster::from_vec(1, 1, vec![0.55]);
    let vari = Raster::from_vec(1, 1, vec![0.175]);
    assert_eq!(joint_mask(&ndvi, &vari, 0.55, 0.175), vec![1]);

    let vari_low = Raster::from_vec(1, 1, vec![0.17499]);
    assert_eq!(joint_mask(&ndvi, &vari_low, 0.55, 0.175), vec![2]);
}

/// Render smoke tests: panel dimensions and legend palette
#[test]
fn test_render_panels() {
    let raster = band(3, 2, &[0.0, 0.5, 1.0]);
    let heatmap = render::render_heatmap(&raster);
    assert_eq!(heatmap.dimensions(), (3, 2));

    let mask = vec![0u8, 1, 2, 1, 0, 2];
    let mask_panel = render::render_mask(&mask, 3, 2);
    assert_eq!(mask_panel.dimensions(), (3, 2));
    assert_eq!(
        mask_panel.get_pixel(0, 0).0,
        render::MASK_LEGEND[0].color
    );
    assert_eq!(
        mask_panel.get_pixel(1, 0).0,
        render::MASK_LEGEND[1].color
    );

    let histogram =
        render::render_histogram(raster.data(), raster.data(), 0.55, 0.175, 128, 96);
    assert_eq!(histogram.dimensions(), (128, 96));

    let composite = render::composite(&[&heatmap, &mask_panel, &histogram], &render::MASK_LEGEND);
    assert!(composite.width() > heatmap.width() + mask_panel.width() + histogram.width());
    assert!(composite.height() >= 96);
}
