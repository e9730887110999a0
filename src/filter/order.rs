use super::types::{Queryable, SortDirection};

/// Sorts entities in place for the paged query executor.
///
/// `sort_by` is resolved case-insensitively against the entity's declared
/// fields; an empty or unrecognized name falls back to the default order
/// (ascending id) so repeated calls with the same input always produce the
/// same sequence. Ties under a named field break by id.
pub fn sort_slice<T: Queryable>(items: &mut [T], sort_by: Option<&str>, direction: SortDirection) {
    let field = sort_by
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|requested| {
            T::fields()
                .iter()
                .find(|f| f.eq_ignore_ascii_case(requested))
                .copied()
        });

    match field {
        Some(field) => items.sort_by(|a, b| {
            let ordering = a
                .field(field)
                .compare(&b.field(field))
                .then_with(|| a.entity_id().cmp(&b.entity_id()));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }),
        None => items.sort_by_key(|e| e.entity_id()),
    }
}
