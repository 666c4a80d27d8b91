mod api_test;
