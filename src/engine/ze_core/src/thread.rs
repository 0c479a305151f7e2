use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::ThreadId;

lazy_static! {
    static ref THREAD_NAME_MAP: RwLock<HashMap<ThreadId, Arc<String>>> =
        RwLock::new(HashMap::new());
}

pub fn set_thread_name(id: ThreadId, name: String) {
    THREAD_NAME_MAP.write().insert(id, Arc::new(name));
}

pub fn get_thread_name(id: ThreadId) -> Option<Arc<String>> {
    THREAD_NAME_MAP.read().get(&id).cloned()
}

#[cfg(test)]
mod tests {
    use crate::thread::{get_thread_name, set_thread_name};

    #[test]
    fn named_thread() {
        let id = std::thread::spawn(|| {
            let id = std::thread::current().id();
            set_thread_name(id, "Worker".to_string());
            id
        })
        .join()
        .unwrap();

        assert_eq!(get_thread_name(id).unwrap().as_str(), "Worker");
    }

    #[test]
    fn unnamed_thread() {
        let id = std::thread::spawn(|| std::thread::current().id())
            .join()
            .unwrap();
        assert!(get_thread_name(id).is_none());
    }
}
