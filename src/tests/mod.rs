// Test helper utilities shared across test modules
mod test_helpers;


// Install/uninstall against a temporary Claude directory
mod install_tests;
