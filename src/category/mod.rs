//! Categories group transactions by what the money was spent on or where it came from.

mod db;
mod domain;
mod form;

pub use db::{CategoryRecord, SQLiteCategoryRepository, create_category_table, get_all_categories};
pub use domain::{Category, CategoryKind, validate_category_color};
pub use form::{CategoryChange, CategoryForm};

use crate::ScreenController;

/// The controller behind the category screen.
pub type CategoryController = ScreenController<CategoryForm, SQLiteCategoryRepository>;

#[cfg(test)]
mod category_controller_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use rusqlite::Connection;

    use crate::{
        Argb, CategoryChange, CategoryController, CategoryKind, MessageRef,
        SQLiteCategoryRepository, UiEvent, WhileSubscribed, db::initialize,
    };

    use super::get_all_categories;

    fn get_test_controller() -> (CategoryController, SQLiteCategoryRepository) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let repository = SQLiteCategoryRepository::new(Arc::new(Mutex::new(connection)));
        let controller =
            CategoryController::new(repository.clone(), WhileSubscribed::default(), "category");

        (controller, repository)
    }

    #[tokio::test]
    async fn income_without_visible_color_is_rejected_before_saving() {
        let (controller, repository) = get_test_controller();
        let mut events = controller.take_events().expect("Events already taken");

        controller.on_field_change(CategoryChange::Name("Salary".to_owned()));
        controller.on_field_change(CategoryChange::Kind(CategoryKind::Income));
        controller.save().await;

        let state = controller.snapshot();
        assert_eq!(
            state.form.color_error,
            Some(MessageRef::ColorRequiredForIncome)
        );
        assert_eq!(state.form_error, None);
        assert!(!state.form.is_saving);
        assert!(events.drain().is_empty());
        assert!(
            get_all_categories(&repository.connection().lock().unwrap())
                .expect("Could not get categories")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn expense_without_color_is_rejected_before_saving() {
        let (controller, repository) = get_test_controller();

        controller.on_field_change(CategoryChange::Name("Rent".to_owned()));
        controller.on_field_change(CategoryChange::Color(None));
        controller.save().await;

        assert_eq!(
            controller.snapshot().form.color_error,
            Some(MessageRef::ColorRequiredForExpense)
        );
        assert!(
            get_all_categories(&repository.connection().lock().unwrap())
                .expect("Could not get categories")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn valid_income_is_saved() {
        let (controller, repository) = get_test_controller();
        let mut events = controller.take_events().expect("Events already taken");

        controller.on_field_change(CategoryChange::Name("Salary".to_owned()));
        controller.on_field_change(CategoryChange::Kind(CategoryKind::Income));
        controller.on_field_change(CategoryChange::Color(Some(Argb(0xFF4C_AF50))));
        controller.on_field_change(CategoryChange::Icon("CASH".to_owned()));
        controller.save().await;

        let categories = get_all_categories(&repository.connection().lock().unwrap())
            .expect("Could not get categories");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].kind, CategoryKind::Income);
        assert_eq!(categories[0].icon.as_deref(), Some("CASH"));
        assert_eq!(
            events.drain(),
            vec![UiEvent::snackbar(MessageRef::SavedSuccessfully)]
        );
    }

    #[tokio::test]
    async fn unreadable_rows_show_load_failed() {
        let (controller, repository) = get_test_controller();
        repository
            .connection()
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO categorias (nome, tipo) VALUES ('Odd', 'TRANSFER')",
                (),
            )
            .expect("Could not insert test row");

        let mut observer = controller.observe();
        let state = tokio::time::timeout(
            Duration::from_secs(5),
            observer.wait_for(|state| state.form_error.is_some()),
        )
        .await
        .expect("Timed out waiting for the load to fail")
        .expect("Controller was dropped");

        assert_eq!(state.form_error, Some(MessageRef::LoadFailed));
        assert!(!state.is_loading);
        assert!(state.items.is_empty());
    }
}
