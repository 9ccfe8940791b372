//! 结果报告输出
//!
//! 终端汇总表格 + 每引擎CSV + 全量JSON。CSV供下游绘制ROC曲线，
//! 不在本工具内做任何绘图。

use super::cli::AppConfig;
use super::runner::SweepRow;
use crate::error::{BenchError, BenchResult};
use chrono::Local;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// 在终端打印汇总表格
pub fn print_summary_table(rows: &[SweepRow]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "引擎 / Engine",
            "灵敏度 / Sensitivity",
            "误报/小时 / FA per hour",
            "漏检率 / Miss rate",
        ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.engine),
            Cell::new(format!("{:.2}", row.sensitivity)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", row.result.false_alarms_per_hour))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", row.result.miss_rate)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!();
    println!("📊 评测结果汇总 / Benchmark summary ({})", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{table}");
}

/// 写出全部结果文件
///
/// 输出目录下生成：每引擎一个`<Engine>.csv`（供绘图），以及一个
/// 带时间戳的全量JSON。
pub fn write_reports(config: &AppConfig, rows: &[SweepRow]) -> BenchResult<()> {
    let Some(output_dir) = config.output_dir.as_ref() else {
        return Ok(());
    };

    std::fs::create_dir_all(output_dir)?;

    write_per_engine_csv(output_dir, rows)?;
    write_json_dump(output_dir, rows)?;

    println!("📄 结果已写入 / Results written to: {}", output_dir.display());
    Ok(())
}

/// 每引擎一个CSV文件
fn write_per_engine_csv(output_dir: &Path, rows: &[SweepRow]) -> BenchResult<()> {
    // 按引擎分组，保持行内顺序
    let mut grouped: BTreeMap<&str, Vec<&SweepRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.engine.as_str()).or_default().push(row);
    }

    for (engine, engine_rows) in grouped {
        let path = output_dir.join(format!("{engine}.csv"));
        let mut file = std::fs::File::create(&path)?;

        writeln!(file, "engine,sensitivity,false_alarm_per_hour,miss_rate")?;
        for row in engine_rows {
            writeln!(
                file,
                "{},{:.4},{:.6},{:.6}",
                row.engine, row.sensitivity, row.result.false_alarms_per_hour, row.result.miss_rate
            )?;
        }
    }

    Ok(())
}

/// 带时间戳的全量JSON
fn write_json_dump(output_dir: &Path, rows: &[SweepRow]) -> BenchResult<()> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("kws_bench_results_{timestamp}.json"));

    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| BenchError::FormatError(format!("结果序列化失败: {e}")))?;
    std::fs::write(&path, json)?;

    Ok(())
}
