use tracing::debug;

use crate::{
    capability::Capabilities,
    normalize::normalize,
    raw::RawCellInfo,
    record::QueryResult,
};

/// Splits raw records into the serving cell and its neighbors.
///
/// The first parseable record flagged as registered is the serving cell. Every
/// other parseable record, registered or not, is a neighbor, in platform order.
/// Unparseable records are dropped.
pub fn classify(records: &[RawCellInfo], caps: &Capabilities) -> QueryResult {
    let mut result = QueryResult::default();
    for (index, info) in records.iter().enumerate() {
        let record = match normalize(&info.cell, caps) {
            Ok(record) => record,
            Err(reason) => {
                debug!(index, %reason, "dropping unparseable cell record");
                continue;
            }
        };
        if info.registered && result.serving_cell.is_none() {
            result.serving_cell = Some(record);
        } else {
            result.neighboring_cells.push(record);
        }
    }
    debug!(
        serving = result.serving_cell.is_some(),
        neighbors = result.neighboring_cells.len(),
        "classified cell records"
    );

    result
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        capability::PlatformLevel,
        raw::{GsmIdentity, LteIdentity, OperatorCodes, RawCell, RawSignal, Reading},
        record::NetworkType,
    };

    fn gsm(cid: i32, registered: bool) -> RawCellInfo {
        RawCellInfo {
            registered,
            cell: RawCell::Gsm {
                identity: Reading::Value(GsmIdentity {
                    cid: Some(Reading::Value(cid)),
                    lac: Some(Reading::Value(5)),
                    operator: OperatorCodes::default(),
                }),
                signal: RawSignal::default(),
            },
        }
    }

    fn lte(ci: i32, registered: bool) -> RawCellInfo {
        RawCellInfo {
            registered,
            cell: RawCell::Lte {
                identity: Reading::Value(LteIdentity {
                    ci: Some(Reading::Value(ci)),
                    ..Default::default()
                }),
                signal: RawSignal::default(),
            },
        }
    }

    fn other(registered: bool) -> RawCellInfo {
        RawCellInfo {
            registered,
            cell: RawCell::Other,
        }
    }

    fn caps() -> Capabilities {
        Capabilities::for_level(PlatformLevel::LATEST)
    }

    fn ids(result: &QueryResult) -> Vec<i64> {
        result
            .neighboring_cells
            .iter()
            .filter_map(|c| c.cell_id)
            .collect()
    }

    #[test]
    fn serving_cell_is_pulled_out() {
        let result = classify(&[gsm(1, false), lte(2, true), gsm(3, false)], &caps());
        let serving = result.serving_cell.as_ref().unwrap();
        assert_eq!(serving.cell_id, Some(2));
        assert_eq!(serving.network_type, NetworkType::Lte);
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn first_registered_wins() {
        let result = classify(&[lte(1, true), lte(2, true), gsm(3, false)], &caps());
        assert_eq!(result.serving_cell.as_ref().unwrap().cell_id, Some(1));
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn unparseable_registered_record_does_not_claim_serving() {
        let result = classify(&[other(true), lte(2, true)], &caps());
        assert_eq!(result.serving_cell.as_ref().unwrap().cell_id, Some(2));
        assert!(result.neighboring_cells.is_empty());
    }

    #[test]
    fn unknown_generation_does_not_stop_scan() {
        let result = classify(&[gsm(1, false), other(false), gsm(3, false)], &caps());
        assert!(result.serving_cell.is_none());
        assert_eq!(ids(&result), vec![1, 3]);
    }

    fn arb_record() -> impl Strategy<Value = RawCellInfo> {
        (0u8..3, any::<bool>(), 1i32..100_000).prop_map(|(kind, registered, id)| {
            match kind {
                0 => gsm(id, registered),
                1 => lte(id, registered),
                _ => other(registered),
            }
        })
    }

    proptest! {
        #[test]
        fn no_registered_means_no_serving(
            records in prop::collection::vec(arb_record(), 0..20),
        ) {
            let records: Vec<_> = records
                .into_iter()
                .map(|r| RawCellInfo { registered: false, ..r })
                .collect();
            let parseable = records
                .iter()
                .filter(|r| r.cell != RawCell::Other)
                .count();

            let result = classify(&records, &caps());
            prop_assert!(result.serving_cell.is_none());
            prop_assert_eq!(result.neighboring_cells.len(), parseable);
        }

        #[test]
        fn single_registered_is_serving_only(
            records in prop::collection::vec(arb_record(), 0..20),
            serving_id in 100_000i32..200_000,
            position in any::<prop::sample::Index>(),
        ) {
            let mut records: Vec<_> = records
                .into_iter()
                .map(|r| RawCellInfo { registered: false, ..r })
                .collect();
            let at = position.index(records.len() + 1);
            records.insert(at, lte(serving_id, true));

            let result = classify(&records, &caps());
            prop_assert_eq!(
                result.serving_cell.as_ref().and_then(|c| c.cell_id),
                Some(i64::from(serving_id))
            );
            prop_assert!(!ids(&result).contains(&i64::from(serving_id)));
        }

        #[test]
        fn nothing_is_lost_or_invented(
            records in prop::collection::vec(arb_record(), 0..20),
        ) {
            let parseable = records
                .iter()
                .filter(|r| r.cell != RawCell::Other)
                .count();
            let result = classify(&records, &caps());
            let total = result.neighboring_cells.len()
                + usize::from(result.serving_cell.is_some());
            prop_assert_eq!(total, parseable);
        }
    }
}
