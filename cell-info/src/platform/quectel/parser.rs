//! Translates `AT+QENG` responses into raw cell records.
//!
//! See the Quectel EC2x "QuecCell AT Commands Manual" for the field layout of
//! `+QENG: "servingcell"` and `+QENG: "neighbourcell ..."` lines.

use tracing::debug;

use crate::raw::{
    GsmIdentity, LteIdentity, OperatorCodes, RawCell, RawCellInfo, RawSignal, Reading,
    WcdmaIdentity,
};

const SERVINGCELL_PREFIX: &str = "+QENG: \"servingcell\",";
// No closing quote, so both "neighbourcell intra" and "neighbourcell inter"
// match.
const NEIGHBOURCELL_PREFIX: &str = "+QENG: \"neighbourcell";

fn split_quoted_fields(line: &str) -> Vec<&str> {
    line.split(',').map(|s| s.trim().trim_matches('"')).collect()
}

fn field<'a>(fields: &[&'a str], idx: usize) -> Option<&'a str> {
    fields
        .get(idx)
        .copied()
        .filter(|s| !s.is_empty() && *s != "-")
}

fn dec(fields: &[&str], idx: usize) -> Option<Reading<i32>> {
    field(fields, idx).and_then(|s| s.parse().ok()).map(Reading::Value)
}

fn hex(fields: &[&str], idx: usize) -> Option<Reading<i32>> {
    field(fields, idx)
        .and_then(|s| i32::from_str_radix(s, 16).ok())
        .map(Reading::Value)
}

/// The modem prints MCC/MNC as plain digits, so the text is the string form
/// and its value the legacy numeric form.
fn operator(fields: &[&str], mcc_idx: usize, mnc_idx: usize) -> OperatorCodes {
    OperatorCodes {
        mcc: dec(fields, mcc_idx),
        mnc: dec(fields, mnc_idx),
        mcc_string: field(fields, mcc_idx).map(|s| Reading::Value(s.to_owned())),
        mnc_string: field(fields, mnc_idx).map(|s| Reading::Value(s.to_owned())),
    }
}

/// Parses the response to `AT+QENG="servingcell"`.
///
/// Returns `None` while the modem is not camped on a cell (`SEARCH`,
/// `LIMSRV` without RAT fields).
pub fn parse_serving_cell(response: &str) -> Option<RawCellInfo> {
    // Some firmwares print one servingcell line per RAT; the last one wins.
    let mut serving = None;
    for line in response.lines() {
        let Some(idx) = line.find(SERVINGCELL_PREFIX) else {
            continue;
        };
        let fields = split_quoted_fields(&line[idx + SERVINGCELL_PREFIX.len()..]);
        // fields[0] is the UE state.
        let Some(rat) = fields.get(1) else {
            debug!(state = fields.first().copied(), "modem not camped on a cell");
            continue;
        };
        let cell = match *rat {
            "GSM" => serving_gsm(&fields[2..]),
            "WCDMA" => serving_wcdma(&fields[2..]),
            "LTE" => serving_lte(&fields[2..]),
            other => {
                debug!(rat = other, "unrecognized serving RAT");
                RawCell::Other
            }
        };
        serving = Some(RawCellInfo {
            registered: true,
            cell,
        });
    }
    serving
}

// <mcc>,<mnc>,<lac>,<cellid>,<bsic>,<arfcn>,<band>,<rxlev>,...
fn serving_gsm(f: &[&str]) -> RawCell {
    RawCell::Gsm {
        identity: Reading::Value(GsmIdentity {
            cid: hex(f, 3),
            lac: hex(f, 2),
            operator: operator(f, 0, 1),
        }),
        signal: RawSignal { dbm: dec(f, 7) },
    }
}

// <mcc>,<mnc>,<lac>,<cellid>,<uarfcn>,<psc>,<rac>,<rscp>,<ecio>,...
fn serving_wcdma(f: &[&str]) -> RawCell {
    RawCell::Wcdma {
        identity: Reading::Value(WcdmaIdentity {
            cid: hex(f, 3),
            lac: hex(f, 2),
            psc: dec(f, 5),
            operator: operator(f, 0, 1),
        }),
        signal: RawSignal { dbm: dec(f, 7) },
    }
}

// <is_tdd>,<mcc>,<mnc>,<cellid>,<pcid>,<earfcn>,<freq_band_ind>,
// <ul_bandwidth>,<dl_bandwidth>,<tac>,<rsrp>,<rsrq>,<rssi>,<sinr>,...
fn serving_lte(f: &[&str]) -> RawCell {
    RawCell::Lte {
        identity: Reading::Value(LteIdentity {
            ci: hex(f, 3),
            tac: hex(f, 9),
            pci: dec(f, 4),
            operator: operator(f, 1, 2),
        }),
        signal: RawSignal { dbm: dec(f, 10) },
    }
}

/// Parses the response to `AT+QENG="neighbourcell"`. Every record is
/// unregistered.
pub fn parse_neighbor_cells(response: &str) -> Vec<RawCellInfo> {
    let mut cells = Vec::new();
    for line in response.lines() {
        let Some(idx) = line.find(NEIGHBOURCELL_PREFIX) else {
            continue;
        };
        let after = &line[idx + NEIGHBOURCELL_PREFIX.len()..];
        // Skip the rest of the "neighbourcell ..." token.
        let Some(comma) = after.find(',') else {
            continue;
        };
        let fields = split_quoted_fields(&after[comma + 1..]);
        let Some((rat, rest)) = fields.split_first() else {
            continue;
        };
        let cell = match *rat {
            "GSM" => neighbor_gsm(rest),
            "WCDMA" => neighbor_wcdma(rest),
            "LTE" => neighbor_lte(rest),
            other => {
                debug!(rat = other, "unrecognized neighbour RAT");
                RawCell::Other
            }
        };
        cells.push(RawCellInfo {
            registered: false,
            cell,
        });
    }
    cells
}

// <mcc>,<mnc>,<lac>,<cellid>,<bsic>,<arfcn>,<rxlev>,...
fn neighbor_gsm(f: &[&str]) -> RawCell {
    RawCell::Gsm {
        identity: Reading::Value(GsmIdentity {
            cid: hex(f, 3),
            lac: hex(f, 2),
            operator: operator(f, 0, 1),
        }),
        signal: RawSignal { dbm: dec(f, 6) },
    }
}

// <uarfcn>,<cell_resel_priority>,<thresh_Xhigh>,<thresh_Xlow>,<psc>,<rscp>,<ecno>,...
fn neighbor_wcdma(f: &[&str]) -> RawCell {
    RawCell::Wcdma {
        identity: Reading::Value(WcdmaIdentity {
            psc: dec(f, 4),
            ..Default::default()
        }),
        signal: RawSignal { dbm: dec(f, 5) },
    }
}

// <earfcn>,<pcid>,<rsrq>,<rsrp>,<rssi>,<sinr>,...
fn neighbor_lte(f: &[&str]) -> RawCell {
    RawCell::Lte {
        identity: Reading::Value(LteIdentity {
            pci: dec(f, 1),
            ..Default::default()
        }),
        signal: RawSignal { dbm: dec(f, 3) },
    }
}
