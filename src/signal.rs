//! Signal helpers for presenting link readings.
//! 用于呈现链路读数的信号辅助函数。

use crate::driver::Bsid;

const MIN_RSSI: i32 = -100;
const MAX_RSSI: i32 = -70;

/// Maps an RSSI in dBm to a bar level in `0..num_levels`.
///
/// Readings at or below -100 dBm map to 0, readings at or above -70 dBm map to
/// the top level, and the span in between is split into equal partitions.
///
/// 将以 dBm 表示的 RSSI 映射为 `0..num_levels` 范围内的信号格数。
pub fn calculate_signal_level(rssi_dbm: i32, num_levels: u32) -> u32 {
    if num_levels < 2 {
        return 0;
    }
    let top = num_levels - 1;
    if rssi_dbm <= MIN_RSSI {
        return 0;
    }
    if rssi_dbm >= MAX_RSSI {
        return top;
    }
    let partition = ((MAX_RSSI - MIN_RSSI) as u32 / top).max(1);
    (((rssi_dbm - MIN_RSSI) as u32) / partition).min(top)
}

/// Vendor-specific split of the 48 BSID bits into decimal fields.
/// 供应商特定的 48 位 BSID 十进制字段划分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsidLayout {
    Samsung,
    Motorola,
    Nokia,
}

impl BsidLayout {
    /// Field widths in bits, most significant field first.
    /// 字段位宽，最高有效字段在前。
    pub fn widths(self) -> &'static [u32] {
        match self {
            BsidLayout::Samsung | BsidLayout::Motorola => &[24, 1, 2, 5, 4, 10, 2],
            BsidLayout::Nokia => &[24, 1, 2, 8, 10, 3],
        }
    }
}

/// Renders a BSID as dotted decimals using a vendor layout.
/// 使用供应商布局将 BSID 呈现为点分十进制。
pub fn translate_bsid(bsid: &Bsid, layout: BsidLayout) -> String {
    // Built-in layouts always cover 48 bits.
    translate_bsid_with(bsid, layout.widths()).unwrap_or_default()
}

/// Renders a BSID with arbitrary field widths. Returns `None` unless the
/// widths add up to exactly 48 bits.
///
/// 使用任意字段位宽呈现 BSID。除非位宽总和恰好为 48 位，否则返回 `None`。
pub fn translate_bsid_with(bsid: &Bsid, widths: &[u32]) -> Option<String> {
    if widths.contains(&0) || widths.iter().sum::<u32>() != 48 {
        return None;
    }
    let value = bsid.as_u64();
    let mut remaining = 48;
    let fields: Vec<String> = widths
        .iter()
        .map(|&width| {
            remaining -= width;
            let mask = (1u64 << width) - 1;
            ((value >> remaining) & mask).to_string()
        })
        .collect();
    Some(fields.join("."))
}
