use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::notification::Notification;

/// Anything a list view keys by id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Application {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Interview {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Swaps in the server's copy of an entity, keeping its position. Returns
/// the replaced value, or `None` if this list never held the entity, in
/// which case the list is left alone.
pub fn replace_by_id<T: Identified>(items: &mut [T], updated: T) -> Option<T> {
    let slot = items.iter_mut().find(|item| item.id() == updated.id())?;
    Some(std::mem::replace(slot, updated))
}

pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

pub fn find_by_id<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
