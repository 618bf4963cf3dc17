//! Outfit composition: carousel positions, form validation, and payload
//! assembly for creating an outfit from the apparel currently on screen.

use thiserror::Error;

use crate::http::Transport;
use crate::state::{ActionFailed, ApparelBuckets, Store};
use crate::types::{ApparelType, CreateOutfit, Outfit};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 50;
const TAGS_MAX: usize = 5;
const TAG_MIN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be between 3 and 50 characters")]
    TitleLength,

    #[error("At least one tag is required")]
    TagsRequired,

    #[error("No more than 5 tags are allowed")]
    TooManyTags,

    #[error("Tag \"{0}\" must be at least 2 characters")]
    TagTooShort(String),
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error("No {0} selected")]
    NothingSelected(ApparelType),

    #[error(transparent)]
    Failed(#[from] ActionFailed),
}

/// Raw form input as typed by the user. `tags` is comma separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutfitForm {
    pub title: String,
    pub description: String,
    pub tags: String,
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Splits a comma separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl OutfitForm {
    pub fn validate(&self) -> Result<ValidForm, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }
        let length = title.chars().count();
        if !(TITLE_MIN..=TITLE_MAX).contains(&length) {
            return Err(FormError::TitleLength);
        }

        let tags = parse_tags(&self.tags);
        if tags.is_empty() {
            return Err(FormError::TagsRequired);
        }
        if tags.len() > TAGS_MAX {
            return Err(FormError::TooManyTags);
        }
        if let Some(short) = tags.iter().find(|tag| tag.chars().count() < TAG_MIN) {
            return Err(FormError::TagTooShort(short.clone()));
        }

        let description = self.description.trim();
        Ok(ValidForm {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            tags,
        })
    }
}

/// Tracks which item of each category the user is looking at.
///
/// Moving a carousel only touches the index for that category; nothing is
/// rebuilt until [`OutfitComposer::build_payload`] reads the positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutfitComposer {
    active: [usize; 4],
    show_coat: bool,
}

fn slot(kind: ApparelType) -> usize {
    match kind {
        ApparelType::Top => 0,
        ApparelType::Bottom => 1,
        ApparelType::Shoes => 2,
        ApparelType::Coat => 3,
    }
}

impl OutfitComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self, kind: ApparelType) -> usize {
        self.active[slot(kind)]
    }

    pub fn set_active(&mut self, kind: ApparelType, index: usize) {
        self.active[slot(kind)] = index;
    }

    /// Step the `kind` carousel forward over `len` items, wrapping from the
    /// last item to the first. Returns the new position.
    pub fn next(&mut self, kind: ApparelType, len: usize) -> usize {
        let index = match len {
            0 => 0,
            _ => (self.active(kind) + 1) % len,
        };
        self.set_active(kind, index);
        index
    }

    /// Step the `kind` carousel back, wrapping from the first item to the
    /// last. Returns the new position.
    pub fn prev(&mut self, kind: ApparelType, len: usize) -> usize {
        let index = match (len, self.active(kind)) {
            (0, _) => 0,
            (_, 0) => len - 1,
            (_, current) => (current - 1).min(len - 1),
        };
        self.set_active(kind, index);
        index
    }

    pub fn show_coat(&self) -> bool {
        self.show_coat
    }

    pub fn set_show_coat(&mut self, show: bool) {
        self.show_coat = show;
    }

    pub fn toggle_coat(&mut self) {
        self.show_coat = !self.show_coat;
    }

    /// Categories currently on screen, in display order.
    pub fn displayed(&self) -> Vec<ApparelType> {
        ApparelType::ALL
            .into_iter()
            .filter(|kind| *kind != ApparelType::Coat || self.show_coat)
            .collect()
    }

    pub fn validate(&self, form: &OutfitForm) -> Result<ValidForm, FormError> {
        form.validate()
    }

    fn selected(&self, items: &ApparelBuckets, kind: ApparelType) -> Result<String, ComposeError> {
        items
            .get(kind)
            .get(self.active(kind))
            .map(|apparel| apparel.id.clone())
            .ok_or(ComposeError::NothingSelected(kind))
    }

    /// Validate `form` and reference the active item of each displayed
    /// category. The coat is omitted while coats are hidden.
    pub fn build_payload(&self, form: &OutfitForm, items: &ApparelBuckets) -> Result<CreateOutfit, ComposeError> {
        let valid = self.validate(form)?;
        let coat_id = if self.show_coat {
            Some(self.selected(items, ApparelType::Coat)?)
        } else {
            None
        };
        Ok(CreateOutfit {
            title: valid.title,
            description: valid.description,
            top_id: self.selected(items, ApparelType::Top)?,
            bottom_id: self.selected(items, ApparelType::Bottom)?,
            shoes_id: self.selected(items, ApparelType::Shoes)?,
            coat_id,
            tags: valid.tags,
        })
    }

    /// Dispatches the create action only when the payload could be built.
    pub fn submit(
        &self,
        store: &mut Store,
        transport: &dyn Transport,
        form: &OutfitForm,
    ) -> Result<Outfit, ComposeError> {
        let payload = self.build_payload(form, &store.apparel.items)?;
        Ok(store.create_outfit(transport, &payload)?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::client::WardrobeClient;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::types::Apparel;

    fn form(title: &str, tags: &str) -> OutfitForm {
        OutfitForm {
            title: title.to_string(),
            description: String::new(),
            tags: tags.to_string(),
        }
    }

    fn item(id: &str, kind: ApparelType) -> Apparel {
        Apparel {
            id: id.to_string(),
            title: id.to_string(),
            picture_url: format!("https://img/{id}.jpg"),
            description: None,
            kind,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn wardrobe() -> ApparelBuckets {
        [
            item("t0", ApparelType::Top),
            item("t1", ApparelType::Top),
            item("b0", ApparelType::Bottom),
            item("s0", ApparelType::Shoes),
            item("s1", ApparelType::Shoes),
            item("c0", ApparelType::Coat),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn title_rules() {
        assert_eq!(form("   ", "ab").validate(), Err(FormError::TitleRequired));
        assert_eq!(form("ab", "ab").validate(), Err(FormError::TitleLength));
        assert_eq!(form(&"x".repeat(51), "ab").validate(), Err(FormError::TitleLength));
        assert!(form("  abc  ", "ab").validate().is_ok());
        assert!(form(&"x".repeat(50), "ab").validate().is_ok());
    }

    #[test]
    fn tag_rules() {
        assert_eq!(form("Date night", "").validate(), Err(FormError::TagsRequired));
        assert_eq!(form("Date night", " , ,").validate(), Err(FormError::TagsRequired));
        assert_eq!(
            form("Date night", "aa,bb,cc,dd,ee,ff").validate(),
            Err(FormError::TooManyTags)
        );
        assert_eq!(
            form("Date night", "summer, x").validate(),
            Err(FormError::TagTooShort("x".to_string()))
        );
    }

    #[test]
    fn valid_form_is_trimmed() {
        let valid = OutfitForm {
            title: "  Date night ".to_string(),
            description: "   ".to_string(),
            tags: " evening , smart ,".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(valid.title, "Date night");
        assert_eq!(valid.description, None);
        assert_eq!(valid.tags, ["evening", "smart"]);
    }

    #[test]
    fn payload_uses_active_indices_and_hides_coat() {
        let mut composer = OutfitComposer::new();
        composer.set_active(ApparelType::Top, 1);
        composer.set_active(ApparelType::Shoes, 1);

        let payload = composer.build_payload(&form("Weekend", "casual"), &wardrobe()).unwrap();
        assert_eq!(payload.top_id, "t1");
        assert_eq!(payload.bottom_id, "b0");
        assert_eq!(payload.shoes_id, "s1");
        assert_eq!(payload.coat_id, None);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn payload_includes_coat_when_shown() {
        let mut composer = OutfitComposer::new();
        composer.toggle_coat();
        assert_eq!(composer.displayed().len(), 4);
        let payload = composer.build_payload(&form("Winter walk", "cold"), &wardrobe()).unwrap();
        assert_eq!(payload.coat_id.as_deref(), Some("c0"));
    }

    #[test]
    fn carousel_wraps_at_both_ends() {
        let mut composer = OutfitComposer::new();
        assert_eq!(composer.next(ApparelType::Top, 3), 1);
        assert_eq!(composer.next(ApparelType::Top, 3), 2);
        assert_eq!(composer.next(ApparelType::Top, 3), 0);

        assert_eq!(composer.prev(ApparelType::Shoes, 3), 2);
        assert_eq!(composer.prev(ApparelType::Shoes, 3), 1);
        assert_eq!(composer.active(ApparelType::Shoes), 1);
        assert_eq!(composer.active(ApparelType::Top), 0);
    }

    #[test]
    fn carousel_over_empty_category_stays_at_zero() {
        let mut composer = OutfitComposer::new();
        assert_eq!(composer.next(ApparelType::Coat, 0), 0);
        assert_eq!(composer.prev(ApparelType::Coat, 0), 0);
    }

    #[test]
    fn carousel_recovers_after_the_list_shrinks() {
        let mut composer = OutfitComposer::new();
        composer.set_active(ApparelType::Bottom, 7);
        assert_eq!(composer.prev(ApparelType::Bottom, 2), 1);
        composer.set_active(ApparelType::Bottom, 7);
        assert_eq!(composer.next(ApparelType::Bottom, 2), 0);
    }

    #[test]
    fn payload_follows_carousel_navigation() {
        let items = wardrobe();
        let mut composer = OutfitComposer::new();
        composer.prev(ApparelType::Top, items.top.len());
        composer.next(ApparelType::Shoes, items.shoes.len());
        composer.next(ApparelType::Shoes, items.shoes.len());

        let payload = composer.build_payload(&form("Weekend", "casual"), &items).unwrap();
        assert_eq!(payload.top_id, "t1");
        assert_eq!(payload.shoes_id, "s0");
    }

    #[test]
    fn missing_item_is_reported_per_category() {
        let mut composer = OutfitComposer::new();
        composer.set_active(ApparelType::Bottom, 3);
        let err = composer.build_payload(&form("Weekend", "casual"), &wardrobe()).unwrap_err();
        assert!(matches!(err, ComposeError::NothingSelected(ApparelType::Bottom)));
        assert_eq!(err.to_string(), "No bottom selected");
    }

    struct Counting {
        calls: Cell<usize>,
    }

    impl Transport for Counting {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.calls.set(self.calls.get() + 1);
            Ok(HttpResponse {
                status: 201,
                headers: Vec::new(),
                body: r#"{"id":"o1","title":"Weekend","topID":"t0","bottomID":"b0","shoesID":"s0","tags":["casual"],"createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}"#.to_string(),
            })
        }
    }

    #[test]
    fn invalid_form_never_reaches_the_transport() {
        let transport = Counting { calls: Cell::new(0) };
        let mut store = Store::new(WardrobeClient::new("http://api.test/api"));
        store.apparel.items = wardrobe();

        let err = OutfitComposer::new()
            .submit(&mut store, &transport, &form("ab", "casual"))
            .unwrap_err();
        assert!(matches!(err, ComposeError::Invalid(FormError::TitleLength)));
        assert_eq!(transport.calls.get(), 0);
        assert!(store.outfits.items.is_empty());
    }

    #[test]
    fn valid_form_creates_outfit() {
        let transport = Counting { calls: Cell::new(0) };
        let mut store = Store::new(WardrobeClient::new("http://api.test/api"));
        store.apparel.items = wardrobe();

        let outfit = OutfitComposer::new()
            .submit(&mut store, &transport, &form("Weekend", "casual"))
            .unwrap();
        assert_eq!(outfit.id, "o1");
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(store.outfits.items.len(), 1);
    }
}
