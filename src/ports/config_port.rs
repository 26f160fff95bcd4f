//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Keys present in a section, sorted. Used to enumerate the
    /// `[categories]` section, where every key is a category name.
    fn section_keys(&self, section: &str) -> Vec<String>;
}
