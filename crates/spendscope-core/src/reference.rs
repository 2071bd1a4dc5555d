//! Pre-loaded categories and payment methods.

use uuid::Uuid;

use spendscope_domain::{Category, Identifiable, NamedEntity, PaymentMethod};

/// Read-only lookup tables; the core never mutates them.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub payment_methods: Vec<PaymentMethod>,
}

impl ReferenceData {
    pub fn new(categories: Vec<Category>, payment_methods: Vec<PaymentMethod>) -> Self {
        Self {
            categories,
            payment_methods,
        }
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn payment_method(&self, id: Uuid) -> Option<&PaymentMethod> {
        find_by_id(&self.payment_methods, id)
    }

    pub fn category_name(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.category(id))
            .map(|category| category.name().to_string())
    }

    pub fn payment_method_name(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.payment_method(id))
            .map(|method| method.name().to_string())
    }
}

fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
