use chrono::{Local, TimeZone};
use image::{ImageBuffer, Rgb};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::model::CovidSnapshot;

pub fn india() -> CovidSnapshot {
    CovidSnapshot {
        country: "India".into(),
        total_cases: 1000,
        recovered: 900,
        deaths: 50,
        active_cases: 50,
        today_cases: 10,
        today_deaths: 1,
        today_recovered: 5,
        last_updated: Local.timestamp_millis_opt(1_700_000_000_000).unwrap(),
    }
}

/// Fresh, empty directory per test name.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("report-core-{}", std::process::id()))
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, _| {
        if x % 2 == 0 { Rgb([255u8, 165, 0]) } else { Rgb([255, 255, 255]) }
    });
    img.save(path).expect("write test png");
}

/// Chart text needs a system font; containers often have none.
pub fn chart_text_supported() -> bool {
    let mut buffer = vec![0u8; 64 * 32 * 3];
    let root = BitMapBackend::with_buffer(&mut buffer, (64, 32)).into_drawing_area();
    root.titled("T", ("sans-serif", 12)).is_ok()
}
