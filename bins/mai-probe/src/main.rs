//! mai-probe - Annex B 裸码流探测工具
//!
//! 面向原始 H.264/HEVC 裸流 (`.264`/`.265`), 逐单元读取并汇总
//! NAL 单元信息. 容器级探测 (分辨率/帧率等) 不在裸流层, 本工具
//! 只报告字节流层面的事实.

use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process;

use mai_nalu::h264::{NalHeader, NalUnitType};
use mai_nalu::h265::{HevcNalHeader, HevcNalUnitType};
use mai_nalu::{AnnexBReader, NalUnitInfo, START_CODE};

/// Mai Annex B 裸码流探测工具
#[derive(Parser, Debug)]
#[command(name = "mai-probe", version, about = "纯 Rust Annex B 裸码流探测工具")]
struct Cli {
    /// 输入文件路径
    input: Option<String>,

    /// 码流编码格式 (h264 | h265 | auto)
    #[arg(long, default_value = "auto")]
    codec: String,

    /// 逐个列出 NAL 单元
    #[arg(long)]
    show_units: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 静默模式 (只输出探测结果)
    #[arg(short, long)]
    quiet: bool,
}

/// 裸流编码格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamCodec {
    H264,
    H265,
}

impl StreamCodec {
    fn name(&self) -> &'static str {
        match self {
            Self::H264 => "H.264",
            Self::H265 => "H.265",
        }
    }
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 完整探测结果
#[derive(Serialize)]
struct ProbeOutput {
    format: FormatInfo,
    type_counts: Vec<TypeCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<Vec<UnitRow>>,
}

/// 格式信息
#[derive(Serialize)]
struct FormatInfo {
    filename: String,
    codec: String,
    file_size: usize,
    nal_count: usize,
    payload_bytes: usize,
}

/// 按 NAL 类型的单元统计
#[derive(Serialize)]
struct TypeCount {
    nal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_id: Option<u8>,
    count: u64,
}

/// 单个 NAL 单元
#[derive(Serialize)]
struct UnitRow {
    index: usize,
    offset: usize,
    size: usize,
    nal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ref_idc: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layer_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temporal_id_plus1: Option<u8>,
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let Some(input_path) = cli.input.clone() else {
        print_banner();
        return;
    };

    if !cli.quiet {
        eprintln!(
            "mai-probe 版本 {} -- Annex B 裸码流探测工具",
            env!("CARGO_PKG_VERSION")
        );
        eprintln!("输入文件: {input_path}");
    }

    let codec = resolve_codec(&cli.codec, &input_path);

    let mut reader = match AnnexBReader::open(&input_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("错误: 无法打开文件 '{input_path}': {e}");
            process::exit(1);
        }
    };

    // 单个单元至多 4 + 流总长字节, 一次性分配输出缓冲区
    let mut buf = vec![0u8; reader.total_size() + START_CODE.len()];

    let mut type_counts: BTreeMap<u8, u64> = BTreeMap::new();
    let mut empty_units = 0u64;
    let mut units: Vec<UnitRow> = Vec::new();
    let mut nal_count = 0usize;
    let mut payload_bytes = 0usize;

    loop {
        match reader.read_next(&mut buf) {
            Ok(Some(info)) => {
                if cli.show_units {
                    units.push(build_unit_row(codec, nal_count, &buf[..info.size], &info));
                }
                nal_count += 1;
                payload_bytes += info.payload_len();
                match info.header {
                    Some(h) => *type_counts.entry(unit_type_id(codec, h)).or_insert(0) += 1,
                    None => empty_units += 1,
                }
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("错误: 读取 NAL 单元失败: {e}");
                process::exit(1);
            }
        }
    }

    let format_info = FormatInfo {
        filename: input_path,
        codec: cli.codec_label(codec),
        file_size: reader.total_size(),
        nal_count,
        payload_bytes,
    };

    let mut counts: Vec<TypeCount> = type_counts
        .iter()
        .map(|(&id, &count)| TypeCount {
            nal_type: type_label(codec, id),
            type_id: Some(id),
            count,
        })
        .collect();
    if empty_units > 0 {
        counts.push(TypeCount {
            nal_type: "(空单元)".to_string(),
            type_id: None,
            count: empty_units,
        });
    }

    // 输出结果
    if cli.json {
        let output = ProbeOutput {
            format: format_info,
            type_counts: counts,
            units: cli.show_units.then_some(units),
        };
        let json = serde_json::to_string_pretty(&output).unwrap();
        println!("{json}");
    } else {
        print_format_text(&format_info);
        print_type_counts_text(&counts);
        if cli.show_units {
            print_units_text(&units);
        }
    }
}

impl Cli {
    /// 探测结果里的编码格式标签, auto 推断时注明来源
    fn codec_label(&self, codec: StreamCodec) -> String {
        if self.codec == "auto" {
            format!("{} (按扩展名推断)", codec.name())
        } else {
            codec.name().to_string()
        }
    }
}

/// 解析 --codec 参数, auto 时按扩展名推断
fn resolve_codec(cli_codec: &str, input: &str) -> StreamCodec {
    match cli_codec {
        "h264" | "avc" => StreamCodec::H264,
        "h265" | "hevc" => StreamCodec::H265,
        "auto" => detect_by_extension(input),
        other => {
            eprintln!("错误: 未知编码格式 '{other}' (支持 h264/h265/auto)");
            process::exit(2);
        }
    }
}

/// 按文件扩展名推断编码格式, 无法识别时按 H.264 处理
fn detect_by_extension(input: &str) -> StreamCodec {
    let ext = Path::new(input)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("264") | Some("h264") | Some("avc") => StreamCodec::H264,
        Some("265") | Some("h265") | Some("hevc") => StreamCodec::H265,
        _ => {
            log::warn!("无法从扩展名推断编码格式, 按 H.264 处理 (可用 --codec 指定)");
            StreamCodec::H264
        }
    }
}

/// 从 NAL 头部首字节提取类型编号
fn unit_type_id(codec: StreamCodec, header: u8) -> u8 {
    match codec {
        StreamCodec::H264 => header & 0x1F,
        StreamCodec::H265 => (header >> 1) & 0x3F,
    }
}

/// 类型编号的显示标签
fn type_label(codec: StreamCodec, type_id: u8) -> String {
    match codec {
        StreamCodec::H264 => NalUnitType::from_type_id(type_id).to_string(),
        StreamCodec::H265 => HevcNalUnitType::from_type_id(type_id).to_string(),
    }
}

/// 从读出的单元字节构建一行单元信息
fn build_unit_row(
    codec: StreamCodec,
    index: usize,
    unit: &[u8],
    info: &NalUnitInfo,
) -> UnitRow {
    let payload = &unit[START_CODE.len()..];
    let mut row = UnitRow {
        index,
        offset: info.offset,
        size: info.size,
        nal_type: "(空载荷)".to_string(),
        ref_idc: None,
        layer_id: None,
        temporal_id_plus1: None,
    };

    let Some(header) = info.header else {
        return row;
    };
    row.nal_type = type_label(codec, unit_type_id(codec, header));

    match codec {
        StreamCodec::H264 => match NalHeader::parse(payload) {
            Ok(h) => row.ref_idc = Some(h.ref_idc),
            Err(e) => log::warn!("单元 #{index}: {e}"),
        },
        StreamCodec::H265 => match HevcNalHeader::parse(payload) {
            Ok(h) => {
                row.layer_id = Some(h.layer_id);
                row.temporal_id_plus1 = Some(h.temporal_id_plus1);
            }
            Err(e) => log::warn!("单元 #{index}: {e}"),
        },
    }

    row
}

// ============================================================
// 文本输出
// ============================================================

/// 文本输出: 格式信息
fn print_format_text(info: &FormatInfo) {
    println!("[FORMAT]");
    println!("  文件名       : {}", info.filename);
    println!("  编码格式     : {}", info.codec);
    println!(
        "  文件大小     : {} 字节 ({:.2} KB)",
        info.file_size,
        info.file_size as f64 / 1024.0
    );
    println!("  NAL 单元数   : {}", info.nal_count);
    println!("  载荷总量     : {} 字节", info.payload_bytes);
    println!("[/FORMAT]");
    println!();
}

/// 文本输出: 按类型统计
fn print_type_counts_text(counts: &[TypeCount]) {
    println!("[TYPES]");
    for tc in counts {
        match tc.type_id {
            Some(id) => println!("  {:<12} (type={:>2}) : {}", tc.nal_type, id, tc.count),
            None => println!("  {:<12}           : {}", tc.nal_type, tc.count),
        }
    }
    println!("[/TYPES]");
    println!();
}

/// 文本输出: 单元列表
fn print_units_text(units: &[UnitRow]) {
    println!("[UNITS]");
    for u in units {
        let mut line = format!(
            "  #{:<5} 偏移={:<10} 大小={:<8} 类型={}",
            u.index, u.offset, u.size, u.nal_type
        );
        if let Some(r) = u.ref_idc {
            line.push_str(&format!(" ref_idc={r}"));
        }
        if let Some(l) = u.layer_id {
            line.push_str(&format!(" layer={l}"));
        }
        if let Some(t) = u.temporal_id_plus1 {
            line.push_str(&format!(" tid+1={t}"));
        }
        println!("{line}");
    }
    println!("[/UNITS]");
    println!();
}

/// 打印版本横幅
fn print_banner() {
    println!(
        "mai-probe 版本 {} -- Annex B 裸码流探测工具",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("用法: mai-probe [选项] <输入文件>");
    println!();
    println!("选项:");
    println!("  --codec <h264|h265|auto>  指定编码格式 (默认按扩展名推断)");
    println!("  --show-units              逐个列出 NAL 单元");
    println!("  --json                    输出 JSON 格式");
    println!("  -q, --quiet               静默模式");
}
