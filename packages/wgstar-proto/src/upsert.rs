/// An entry identified by a natural string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Replace-or-append: every entry sharing `item`'s key is removed, then `item`
/// is pushed. An updated entry therefore always ends up last.
pub fn upsert<T: Keyed>(items: &mut Vec<T>, item: T) {
    items.retain(|existing| existing.key() != item.key());
    items.push(item);
}

pub fn find_by_key<'a, T: Keyed>(items: &'a [T], key: &str) -> Option<&'a T> {
    items.iter().find(|item| item.key() == key)
}
