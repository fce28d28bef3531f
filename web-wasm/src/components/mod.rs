pub mod header;
pub mod bottom_nav;
pub mod settings_panel;
pub mod scanner_view;
pub mod table_view;
pub mod folder_view;
