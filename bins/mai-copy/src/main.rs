//! mai-copy - Annex B 裸码流规范化复制工具
//!
//! 逐单元读取输入裸流, 以统一的 4 字节起始码逐单元写出. 可用于
//! 整理混用 3/4 字节起始码的码流, 或作为读取器往返一致性的校验手段:
//! 输入若已统一使用 4 字节起始码, 输出与输入逐字节相同.

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;

use log::{debug, info};
use mai_nalu::AnnexBReader;

/// Mai Annex B 裸码流规范化复制工具
#[derive(Parser, Debug)]
#[command(name = "mai-copy", version, about = "纯 Rust Annex B 裸码流规范化复制工具")]
struct Cli {
    /// 输入文件路径
    #[arg(short, long)]
    input: String,

    /// 输出文件路径
    #[arg(short, long)]
    output: String,

    /// 覆盖已存在的输出文件
    #[arg(short = 'y', long = "overwrite")]
    overwrite: bool,

    /// 最多复制的单元数
    #[arg(long)]
    limit: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.overwrite && Path::new(&cli.output).exists() {
        eprintln!("错误: 输出文件 '{}' 已存在 (使用 -y 覆盖)", cli.output);
        process::exit(1);
    }

    let mut reader = match AnnexBReader::open(&cli.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("错误: 无法打开文件 '{}': {e}", cli.input);
            process::exit(1);
        }
    };

    let out_file = match File::create(&cli.output) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("错误: 无法创建输出文件 '{}': {e}", cli.output);
            process::exit(1);
        }
    };
    let mut writer = BufWriter::new(out_file);

    info!(
        "mai-copy: {} ({} 字节) -> {}",
        cli.input,
        reader.total_size(),
        cli.output
    );

    // 单个单元至多 4 + 流总长字节
    let mut buf = vec![0u8; reader.total_size() + 4];
    let mut nal_count = 0u64;
    let mut bytes_out = 0u64;

    loop {
        if cli.limit.is_some_and(|limit| nal_count >= limit) {
            info!("达到单元数上限 {}, 停止复制", nal_count);
            break;
        }

        match reader.read_next(&mut buf) {
            Ok(Some(unit)) => {
                if let Err(e) = writer.write_all(&buf[..unit.size]) {
                    eprintln!("错误: 写入输出文件失败: {e}");
                    process::exit(1);
                }
                debug!("单元 #{nal_count}: 偏移={} 大小={}", unit.offset, unit.size);
                nal_count += 1;
                bytes_out += unit.size as u64;
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("错误: 读取 NAL 单元失败: {e}");
                process::exit(1);
            }
        }
    }

    if let Err(e) = writer.flush() {
        eprintln!("错误: 写入输出文件失败: {e}");
        process::exit(1);
    }

    println!(
        "复制完成: {nal_count} 个单元, 输出 {bytes_out} 字节 (输入 {} 字节)",
        reader.total_size()
    );
}
