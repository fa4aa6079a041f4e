mod reconnect_tests;
