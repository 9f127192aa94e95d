mod units_tests;
