mod encrypted_store_tests;
