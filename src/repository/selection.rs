use crate::model::CollectionCase;

/// Latest case by `createdDateTime`, ties broken by the greatest id.
///
/// Cases without a creation time order before any timestamped case.
pub fn latest_case<I>(cases: I) -> Option<CollectionCase>
where
    I: IntoIterator<Item = CollectionCase>,
{
    cases.into_iter().max_by(|a, b| {
        a.created_date_time
            .cmp(&b.created_date_time)
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// The canonical case at an address: drop individual (HI) cases and
/// address-invalid cases, then take the latest of what remains.
pub fn select_latest_valid_non_individual(cases: Vec<CollectionCase>) -> Option<CollectionCase> {
    latest_case(
        cases
            .into_iter()
            .filter(|case| !case.is_individual())
            .filter(|case| !case.address_invalid),
    )
}
